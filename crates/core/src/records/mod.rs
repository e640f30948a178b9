mod dates;
mod types;

pub use dates::parse_flexible_date;
pub use types::{
    expand_travel_sheet_row, Appointment, Collection, Employee, NewAppointment, NewEmployee,
    NewTravel, TravelAuthority, TravelSheetRow,
};
