pub mod digest_service;
pub mod engagement_service;
pub mod geocoding_service;
pub mod member_service;
pub mod notify_service;
pub mod proximity_service;
