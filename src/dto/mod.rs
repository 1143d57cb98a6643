pub mod assessment_dto;
pub mod recommendation_dto;
