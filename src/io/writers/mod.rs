mod markdown;
mod terminal;

pub use markdown::MarkdownWriter;
pub use terminal::TerminalWriter;
