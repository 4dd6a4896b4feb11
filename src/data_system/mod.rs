pub mod flight_events;
pub mod flight_table;
pub mod sample_table;
pub mod table_loader;
