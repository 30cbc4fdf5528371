//! Data models for `gradepoint`

pub mod course;
pub mod grade;
pub mod level;
pub mod subject;

pub use course::{Course, CourseSpec};
pub use grade::{
    GradeBucket, GradePoint, GradeResult, LetterGrade, PredictionResult, PredictionStatus,
};
pub use level::{normalize_key, Level};
pub use subject::{Subject, SubjectField};
