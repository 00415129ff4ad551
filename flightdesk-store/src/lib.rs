pub mod app_config;
pub mod database;
pub mod flight_repo;
pub mod passenger_repo;
pub mod weather_client;

pub use database::DbClient;
pub use flight_repo::PostgresFlightStore;
pub use passenger_repo::PostgresPassengerStore;
pub use weather_client::MetaWeatherClient;
