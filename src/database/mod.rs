pub mod current_user_repo;
pub mod engagement_repo;
pub mod featured_member_repo;
pub mod member_repo;
pub mod nearby_repo;
pub mod notice_repo;
