use colored::Colorize;

use super::page::{Page, Route};

/// Prints page changes to the terminal.
///
/// Tracks how much of the transcript has been shown so each call prints only
/// new entries.
#[derive(Debug, Default)]
pub struct Renderer {
    shown: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines appended since the last render
    pub fn pending<'a>(&self, page: &'a Page) -> &'a [String] {
        let transcript = page.transcript();
        &transcript[self.shown.min(transcript.len())..]
    }

    /// Print new transcript entries, then the active error display
    pub fn render(&mut self, page: &Page) {
        for line in self.pending(page) {
            if let Some(reply) = line.strip_prefix("Bot: ") {
                println!("{} {}", "Bot:".cyan().bold(), reply);
            } else if let Some(sent) = line.strip_prefix("You: ") {
                println!("{} {}", "You:".green().bold(), sent);
            } else {
                println!("{}", line);
            }
        }
        self.shown = page.transcript().len();

        let error = match page.route {
            Route::Landing => &page.login_error,
            Route::Chat => &page.chat_error,
        };
        if !error.is_empty() {
            eprintln!("{}", error.red());
        }
        if !page.notice.is_empty() {
            println!("{}", page.notice.yellow());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_only_returns_new_lines() {
        let mut page = Page::new("m");
        page.append_transcript("You: hi".to_string());
        page.append_transcript("Bot: hello".to_string());

        let mut renderer = Renderer::new();
        assert_eq!(renderer.pending(&page).len(), 2);

        renderer.render(&page);
        assert!(renderer.pending(&page).is_empty());

        page.append_transcript("You: again".to_string());
        assert_eq!(renderer.pending(&page), ["You: again".to_string()]);
    }
}
