/// Raw, untrusted text typed into a capture form. Only changed through
/// explicit updates (or cleared by the controller); nothing is normalised
/// here, trimming happens at validation time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmailInput(String);

impl EmailInput {
    pub fn update(
        &mut self,
        raw: String,
    ) {
        self.0 = raw;
    }

    pub fn clear(&mut self) { self.0.clear() }
}

impl AsRef<str> for EmailInput {
    fn as_ref(&self) -> &str { &self.0 }
}
