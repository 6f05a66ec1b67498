pub mod nominatim;
pub mod openrouteservice;
pub mod storage;
