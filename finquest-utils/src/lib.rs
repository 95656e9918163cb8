/// Shared formatting helpers (money, XP bars, labels).
pub mod formatting;
/// Text pagination for long listings.
pub mod pagination;
/// Pure parser helpers.
pub mod parse;
/// Shared time helpers.
pub mod time;
