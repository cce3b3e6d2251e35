use chrono::Utc;
use circulation_core::*;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

mod seed;

/// Display date format, day first as on the circulation desk
const DATE_FORMAT: &str = "%d-%m-%Y";

#[derive(Parser)]
#[command(name = "circulate")]
#[command(about = "Library circulation and fine management system", long_about = None)]
struct Cli {
    /// Override config file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Preload demo books and members into the session
    #[arg(long)]
    seed: bool,
}

/// One in-memory circulation session. State lives for the process only.
struct Session {
    catalog: Catalog,
    roster: Roster,
    ledger: Ledger,
}

impl Session {
    fn new(policy: CirculationPolicy) -> Self {
        Self {
            catalog: Catalog::new(),
            roster: Roster::new(),
            ledger: Ledger::new(policy),
        }
    }
}

fn main() -> Result<()> {
    circulation_core::logging::init();

    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let mut session = Session::new(config.policy());
    if cli.seed {
        seed::populate(&mut session)?;
        println!("Demo data loaded.");
    }

    run_menu(&mut session)
}

fn run_menu(session: &mut Session) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        show_menu();
        print!("Enter choice: ");
        io::stdout().flush()?;

        let choice = match next_line(&mut lines)? {
            Some(line) => line,
            None => break, // stdin closed
        };

        let result = match choice.as_str() {
            "1" => cmd_add_book(session, &mut lines),
            "2" => cmd_view_books(session),
            "3" => cmd_search_books(session, &mut lines),
            "4" => cmd_update_book(session, &mut lines),
            "5" => cmd_register_member(session, &mut lines),
            "6" => cmd_view_members(session),
            "7" => cmd_search_member(session, &mut lines),
            "8" => cmd_issue(session, &mut lines),
            "9" => cmd_return(session, &mut lines),
            "10" => cmd_active_issues(session),
            "11" => cmd_history(session),
            "12" => cmd_reminders(session),
            "13" => cmd_export_report(session, &mut lines),
            "0" => {
                println!("Exiting. Goodbye!");
                break;
            }
            _ => {
                println!("Invalid choice. Please try again.");
                Ok(())
            }
        };

        // Domain errors are user feedback, not process failures
        if let Err(e) = result {
            println!("Error: {}", e);
        }
        println!();
    }

    Ok(())
}

fn show_menu() {
    println!("========== Library Circulation & Fine System ==========");
    println!("1.  Add Book");
    println!("2.  View All Books");
    println!("3.  Search Books");
    println!("4.  Update Book");
    println!("5.  Register Member");
    println!("6.  View All Members");
    println!("7.  Search Member by ID");
    println!("8.  Issue Book");
    println!("9.  Return Book");
    println!("10. View Active Issues");
    println!("11. View Issue History");
    println!("12. Show Due/Overdue Reminders");
    println!("13. Export Report");
    println!("0.  Exit");
}

// ============================================================================
// Input helpers
// ============================================================================

type Lines<'a> = io::Lines<io::StdinLock<'a>>;

/// Next trimmed stdin line, or `None` once stdin is closed
fn next_line(lines: &mut Lines<'_>) -> Result<Option<String>> {
    match lines.next() {
        Some(line) => Ok(Some(line?.trim().to_string())),
        None => Ok(None),
    }
}

fn prompt(lines: &mut Lines<'_>, label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    next_line(lines)?.ok_or_else(|| Error::InvalidArgument("input ended".into()))
}

fn prompt_u32(lines: &mut Lines<'_>, label: &str) -> Result<u32> {
    let raw = prompt(lines, label)?;
    raw.parse()
        .map_err(|_| Error::InvalidArgument(format!("'{}' is not a valid count", raw)))
}

fn prompt_u64(lines: &mut Lines<'_>, label: &str) -> Result<u64> {
    let raw = prompt(lines, label)?;
    raw.parse()
        .map_err(|_| Error::InvalidArgument(format!("'{}' is not a valid id", raw)))
}

// ============================================================================
// Display helpers
// ============================================================================

fn display_book(book: &Book) {
    println!(
        "[{}] {} by {} | Category: {} | Available: {}/{}",
        book.id, book.title, book.author, book.category, book.available_copies, book.total_copies
    );
}

fn display_member(member: &Member) {
    println!(
        "[{}] {} ({}) | Books borrowed: {} | Outstanding fine: {} | Status: {}",
        member.id,
        member.name,
        member.phone,
        member.borrowed_books.len(),
        member.outstanding_fine,
        if member.blocked { "BLOCKED" } else { "ACTIVE" }
    );
}

fn display_record(record: &IssueRecord) {
    let (status, return_str) = match record.returned_at() {
        Some(at) => ("Returned", at.format(DATE_FORMAT).to_string()),
        None => ("Issued", "-".to_string()),
    };
    println!(
        "IssueID: {} | Book: {} | Member: {} | Issue: {} | Due: {} | Return: {} | Fine: {} | Status: {}",
        record.id,
        record.book_id,
        record.member_id,
        record.issued_at.format(DATE_FORMAT),
        record.due_at.format(DATE_FORMAT),
        return_str,
        record.fine_charged(),
        status
    );
}

// ============================================================================
// Commands
// ============================================================================

fn cmd_add_book(session: &mut Session, lines: &mut Lines<'_>) -> Result<()> {
    println!("--- Add New Book ---");
    let id = prompt(lines, "Enter Book ID: ")?;
    let title = prompt(lines, "Enter Title: ")?;
    let author = prompt(lines, "Enter Author: ")?;
    let category = prompt(lines, "Enter Category (Fiction/Science/etc.): ")?;
    let total_copies = prompt_u32(lines, "Enter Total Copies: ")?;

    session
        .catalog
        .add_book(&id, &title, &author, &category, total_copies)?;
    println!("Book added successfully.");
    Ok(())
}

fn cmd_view_books(session: &Session) -> Result<()> {
    println!("--- All Books ---");
    if session.catalog.is_empty() {
        println!("No books in inventory.");
        return Ok(());
    }
    for book in session.catalog.books() {
        display_book(book);
    }
    Ok(())
}

fn cmd_search_books(session: &Session, lines: &mut Lines<'_>) -> Result<()> {
    println!("--- Search Books ---");
    let keyword = prompt(lines, "Enter keyword (title/author/category): ")?;

    let results: Vec<_> = session.catalog.search(&keyword)?.collect();
    if results.is_empty() {
        println!("No matching books found.");
    } else {
        for book in results {
            display_book(book);
        }
    }
    Ok(())
}

fn cmd_update_book(session: &mut Session, lines: &mut Lines<'_>) -> Result<()> {
    println!("--- Update Book ---");
    let id = prompt(lines, "Enter Book ID to update: ")?;
    // Resolve first so the user sees current values in the prompts
    let current = session.catalog.find(&id)?.clone();

    println!("Leave any field blank to keep existing value.");
    let title = prompt(lines, &format!("Title [{}]: ", current.title))?;
    let author = prompt(lines, &format!("Author [{}]: ", current.author))?;
    let category = prompt(lines, &format!("Category [{}]: ", current.category))?;
    let total_raw = prompt(lines, &format!("Total copies [{}]: ", current.total_copies))?;

    let total_copies = if total_raw.is_empty() {
        None
    } else {
        Some(total_raw.parse().map_err(|_| {
            Error::InvalidArgument(format!("'{}' is not a valid count", total_raw))
        })?)
    };

    let update = BookUpdate {
        title: (!title.is_empty()).then_some(title),
        author: (!author.is_empty()).then_some(author),
        category: (!category.is_empty()).then_some(category),
        total_copies,
    };

    let book = session.catalog.update_book(&id, update)?;
    print!("Book updated: ");
    display_book(book);
    Ok(())
}

fn cmd_register_member(session: &mut Session, lines: &mut Lines<'_>) -> Result<()> {
    println!("--- Register Member ---");
    let id = prompt(lines, "Enter Member ID: ")?;
    let name = prompt(lines, "Enter Name: ")?;
    let phone = prompt(lines, "Enter Phone: ")?;

    session.roster.register(&id, &name, &phone)?;
    println!("Member registered successfully.");
    Ok(())
}

fn cmd_view_members(session: &Session) -> Result<()> {
    println!("--- All Members ---");
    if session.roster.is_empty() {
        println!("No members registered.");
        return Ok(());
    }
    for member in session.roster.members() {
        display_member(member);
    }
    Ok(())
}

fn cmd_search_member(session: &Session, lines: &mut Lines<'_>) -> Result<()> {
    println!("--- Search Member ---");
    let id = prompt(lines, "Enter Member ID: ")?;
    let member = session.roster.find(&id)?;
    display_member(member);
    if member.borrowed_books.is_empty() {
        println!("No books currently borrowed.");
    } else {
        println!("Borrowed books: {}", member.borrowed_books.join(", "));
    }
    Ok(())
}

fn cmd_issue(session: &mut Session, lines: &mut Lines<'_>) -> Result<()> {
    println!("--- Issue Book ---");
    let book_id = prompt(lines, "Enter Book ID: ")?;
    let member_id = prompt(lines, "Enter Member ID: ")?;

    let record = session.ledger.issue(
        &mut session.catalog,
        &mut session.roster,
        &book_id,
        &member_id,
        Utc::now(),
    )?;

    println!("Book issued successfully.");
    println!("Due date: {}", record.due_at.format(DATE_FORMAT));
    display_record(record);
    Ok(())
}

fn cmd_return(session: &mut Session, lines: &mut Lines<'_>) -> Result<()> {
    println!("--- Return Book ---");
    let issue_id = prompt_u64(lines, "Enter Issue ID: ")?;

    let receipt = session.ledger.return_book(
        &mut session.catalog,
        &mut session.roster,
        issue_id,
        Utc::now(),
    )?;

    println!("Book return recorded.");
    println!(
        "Late days: {}, Fine charged: {}",
        receipt.late_days, receipt.fine_charged
    );
    println!(
        "Member outstanding fine now: {}",
        receipt.member_outstanding
    );
    if receipt.member_blocked {
        println!("Member is now BLOCKED due to high fines.");
    }
    Ok(())
}

fn cmd_active_issues(session: &Session) -> Result<()> {
    println!("--- Active Issues (Not Returned) ---");
    let mut any = false;
    for record in session.ledger.active_issues() {
        display_record(record);
        any = true;
    }
    if !any {
        println!("No active issues.");
    }
    Ok(())
}

fn cmd_history(session: &Session) -> Result<()> {
    println!("--- All Issue Records (History) ---");
    if session.ledger.is_empty() {
        println!("No issue records.");
        return Ok(());
    }
    for record in session.ledger.history() {
        display_record(record);
    }
    Ok(())
}

fn cmd_reminders(session: &Session) -> Result<()> {
    println!("--- Due / Overdue Reminders ---");
    let reminders = session.ledger.reminders(Utc::now());
    if reminders.is_empty() {
        println!("No books are due soon or overdue.");
        return Ok(());
    }

    for reminder in reminders {
        let book_title = session
            .catalog
            .find(&reminder.book_id)
            .map(|b| b.title.clone())
            .unwrap_or_else(|_| "Unknown".to_string());
        let member_name = session
            .roster
            .find(&reminder.member_id)
            .map(|m| m.name.clone())
            .unwrap_or_else(|_| "Unknown".to_string());
        let due_str = reminder.due_at.format(DATE_FORMAT);

        match reminder.status {
            DueStatus::Overdue { late_by } => println!(
                "[OVERDUE] IssueID {} | Book: {} | Member: {} | Due: {} | Late by {} day(s)",
                reminder.issue_id, book_title, member_name, due_str, late_by
            ),
            DueStatus::DueSoon { days_to_due } => println!(
                "[DUE SOON] IssueID {} | Book: {} | Member: {} | Due in {} day(s) on {}",
                reminder.issue_id, book_title, member_name, days_to_due, due_str
            ),
        }
    }
    Ok(())
}

fn cmd_export_report(session: &Session, lines: &mut Lines<'_>) -> Result<()> {
    println!("--- Export Report ---");
    let format_raw = prompt(lines, "Format (text/json/pdf) [text]: ")?;
    let format = match format_raw.to_lowercase().as_str() {
        "" | "text" => ReportFormat::Text,
        "json" => ReportFormat::Json,
        "pdf" => ReportFormat::Pdf,
        other => {
            println!("Unknown format '{}', using text.", other);
            ReportFormat::Text
        }
    };

    let report = LibraryReport::build(
        &session.ledger,
        &session.catalog,
        &session.roster,
        Utc::now(),
    );
    // Rendering failure never touches circulation state; surface and move on
    let rendered = match report.render(format) {
        Ok(rendered) => rendered,
        Err(Error::ReportUnavailable(reason)) => {
            println!("Report format unavailable: {}", reason);
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let path = prompt(lines, "Output file (blank to print): ")?;
    if path.is_empty() {
        println!("{}", rendered);
    } else {
        std::fs::write(&path, rendered)?;
        println!("Report saved as '{}'.", path);
    }
    Ok(())
}
