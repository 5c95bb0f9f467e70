pub mod de;
pub mod estimate;
pub mod lot;
pub mod reservation;
pub mod status;
