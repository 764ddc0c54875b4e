pub mod course;
pub mod quiz;

pub use course::{
    Basics, CoursePayload, CourseStatus, DraftRecord, Lecture, Pricing, Resource, ResourceKind,
    Section, VideoRef,
};
pub use quiz::{QuestionPatch, QuizOption, QuizQuestion};
