pub mod console;

pub use console::ConsoleResolver;

/// Display a warning message with formatting
pub fn show_warning(message: &str) {
    use colored::*;
    println!("{} {}", "⚠".yellow().bold(), message.yellow());
}

/// Create a formatted header
pub fn print_header(title: &str) {
    use colored::*;
    let width = 60;
    let border = "═".repeat(width);
    println!("\n{}", border.cyan());
    println!("{}", title.cyan().bold());
    println!("{}", border.cyan());
}
