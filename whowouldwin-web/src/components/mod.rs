pub mod button;
pub mod candidate_card;
pub mod footer;
pub mod header;
pub mod leaderboard;
pub mod retry_banner;
