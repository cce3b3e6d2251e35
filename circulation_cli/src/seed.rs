//! Demo data for exercising the interactive session without typing
//! fixtures in by hand.

use crate::Session;
use circulation_core::Result;

/// Insert a handful of books and members into a fresh session
pub fn populate(session: &mut Session) -> Result<()> {
    session
        .catalog
        .add_book("B1", "Dune", "Frank Herbert", "Fiction", 3)?;
    session
        .catalog
        .add_book("B2", "A Brief History of Time", "Stephen Hawking", "Science", 2)?;
    session
        .catalog
        .add_book("B3", "The Pragmatic Programmer", "Hunt & Thomas", "Technology", 1)?;

    session.roster.register("M1", "Ada Lovelace", "555-0100")?;
    session.roster.register("M2", "Grace Hopper", "555-0101")?;

    Ok(())
}
