/// Which view is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    /// Sign-in view
    #[default]
    Landing,
    /// Chat view
    Chat,
}

/// In-memory model of the chat client's visible surface.
///
/// Holds the form fields the operations read from, the two error displays
/// they write to, and the transcript. The terminal renderer reads it back.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub email: String,
    pub password: String,
    /// Message input
    pub message: String,
    /// Model selector
    pub llm: String,
    pub login_error: String,
    pub chat_error: String,
    /// Informational text (registration, password reset)
    pub notice: String,
    transcript: Vec<String>,
    pub route: Route,
}

impl Page {
    pub fn new(llm: impl Into<String>) -> Self {
        Self {
            llm: llm.into(),
            ..Self::default()
        }
    }

    /// Pre-fill the login form
    pub fn with_credentials(mut self, email: impl Into<String>, password: impl Into<String>) -> Self {
        self.email = email.into();
        self.password = password.into();
        self
    }

    /// Append-only transcript
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    pub fn append_transcript(&mut self, line: String) {
        self.transcript.push(line);
    }

    /// Navigate to another view
    pub fn navigate(&mut self, route: Route) {
        self.route = route;
    }
}
