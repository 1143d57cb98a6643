pub mod assessment_service;
pub mod extraction_service;
pub mod model_client;
pub mod prompt_service;
pub mod recommendation_service;
pub mod report_service;
pub mod scoring_service;
