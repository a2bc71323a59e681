use crate::mailer::Email;
use crate::render::escape_html;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

impl ContactForm {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Please tell me your name.".to_string());
        }
        if self.message.trim().is_empty() {
            return Err("Please write a message.".to_string());
        }
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err("Please enter a valid email address.".to_string());
        }
        Ok(())
    }

    pub fn to_email(&self, from: &str, to: &str) -> Email {
        let name = self.name.trim();
        let message = self.message.trim();

        Email {
            from: from.to_string(),
            to: to.to_string(),
            reply_to: Some(self.email.trim().to_string()),
            subject: format!("Contact form message from {name}"),
            text: format!("{name} <{}> wrote:\n\n{message}\n", self.email.trim()),
            html: format!(
                "<p>{} &lt;{}&gt; wrote:</p><p>{}</p>",
                escape_html(name),
                escape_html(self.email.trim()),
                escape_html(message).replace('\n', "<br>")
            ),
        }
    }
}
