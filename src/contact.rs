//! Contact form. Submissions are acknowledged locally and never sent.

pub const THANK_YOU: &str = "Thank you for your message! I'll get back to you soon.";
pub const INCOMPLETE: &str = "Please fill in all fields.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    Name,
    Email,
    Message,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Name, Field::Email, Field::Message];

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Email => "Email",
            Field::Message => "Message",
        }
    }

    fn next(self) -> Self {
        match self {
            Field::Name => Field::Email,
            Field::Email => Field::Message,
            Field::Message => Field::Name,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
    pub focus: Field,
}

impl ContactForm {
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Message => &self.message,
        }
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Message => &mut self.message,
        }
    }

    pub fn input(&mut self, c: char) {
        self.focused_mut().push(c);
    }

    pub fn backspace(&mut self) {
        self.focused_mut().pop();
    }

    pub fn next_field(&mut self) {
        self.focus = self.focus.next();
    }

    /// Acknowledge and reset a complete form; keep an incomplete one.
    pub fn submit(&mut self) -> &'static str {
        if Field::ALL.iter().any(|f| self.value(*f).trim().is_empty()) {
            return INCOMPLETE;
        }
        tracing::debug!("contact form acknowledged locally");
        *self = Self::default();
        THANK_YOU
    }
}
