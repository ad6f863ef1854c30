/// Synthesis orchestration and per-crack random sources
pub mod executor;
/// Seed point selection and initial headings
pub mod seeding;
/// Branch growth, thickness profile and tail extension
pub mod stroke;
