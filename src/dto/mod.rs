pub mod auth_dto;
pub mod profile_dto;
pub mod supervisor_dto;
