use shared::BookingResponse;

use crate::domain::commands::turnos::BookingResult;

/// Mapper from domain booking outcomes to the gateway DTO.
pub struct BookingMapper;

impl BookingMapper {
    pub fn to_dto(result: BookingResult) -> BookingResponse {
        BookingResponse {
            message: result.message,
            credit_consumed: result.credit_consumed,
        }
    }
}
