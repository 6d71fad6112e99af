use colored::Colorize;

pub fn handle_error(err: anyhow::Error) -> ! {
    eprintln!("{} {:#}", "Error:".red().bold(), err);

    let msg = err.to_string().to_lowercase();

    if msg.contains("not found") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  List available resources with:");
        eprintln!("  {} agentdeck list", "$".dimmed());
    }

    if msg.contains("already exists") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  Resource names are unique ignoring case; pick another name.");
    }

    if msg.contains("storage unavailable") || msg.contains("failed to open database") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  Check that no other agentdeck process holds the database.");
    }

    std::process::exit(1);
}
