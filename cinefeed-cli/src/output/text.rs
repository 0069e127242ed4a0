//! Text output formatting with colors.

use cinefeed_core::{ClassifiedError, Movie};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Formats an accumulated list of movies, one line per entry.
    pub fn format_list(&self, movies: &[Movie]) -> String {
        if movies.is_empty() {
            return self.dim("No movies found.");
        }

        let mut lines = Vec::with_capacity(movies.len() + 1);
        for movie in movies {
            lines.push(format!(
                "{:>8}  {}",
                self.cyan(&movie.id.to_string()),
                self.bold(&movie.title)
            ));
        }
        lines.push(self.dim(&format!("{} movie(s)", movies.len())));
        lines.join("\n")
    }

    /// Formats a single movie with its full overview.
    pub fn format_movie(&self, movie: &Movie) -> String {
        let mut lines = Vec::new();
        lines.push(self.bold(&movie.title));
        lines.push(format!("Id:     {}", self.cyan(&movie.id.to_string())));
        lines.push(format!("Poster: {}", movie.poster_url));
        lines.push(String::new());
        lines.push(movie.overview.clone());
        lines.join("\n")
    }

    /// Formats a classified error for stderr.
    pub fn format_error(&self, error: &ClassifiedError) -> String {
        if self.use_colors {
            format!("{}✗ {}{}", RED, error.message, RESET)
        } else {
            format!("✗ {}", error.message)
        }
    }

    // ========================================================================
    // Color helpers
    // ========================================================================

    fn bold(&self, s: &str) -> String {
        if self.use_colors {
            format!("{}{}{}", BOLD, s, RESET)
        } else {
            s.to_string()
        }
    }

    fn dim(&self, s: &str) -> String {
        if self.use_colors {
            format!("{}{}{}", DIM, s, RESET)
        } else {
            s.to_string()
        }
    }

    fn cyan(&self, s: &str) -> String {
        if self.use_colors {
            format!("{}{}{}", CYAN, s, RESET)
        } else {
            s.to_string()
        }
    }
}
