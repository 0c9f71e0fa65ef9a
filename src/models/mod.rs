mod question;
mod result;

pub use question::{
    AnswerOption, Difficulty, OptionId, ParseTagError, Question, QuestionId, QuestionView,
    Subject,
};
pub use result::{ExamResult, Grade, QuestionOutcome, score_percentage};
