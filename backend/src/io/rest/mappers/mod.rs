pub mod booking_mapper;
pub mod calendar_mapper;

pub use booking_mapper::BookingMapper;
pub use calendar_mapper::CalendarMapper;
