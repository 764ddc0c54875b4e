//! Quiz question operations, usable at section or lecture scope.
//!
//! Same discipline as the parent module: pure transforms, out-of-range
//! addressing is a no-op.

use crate::models::{QuestionPatch, QuizOption, QuizQuestion, Section};

/// Where a quiz lives: directly on a section, or on a lecture within one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizHost {
    Section(usize),
    Lecture(usize, usize),
}

fn with_quiz(
    sections: &[Section],
    host: QuizHost,
    f: impl FnOnce(&mut Vec<QuizQuestion>),
) -> Vec<Section> {
    let mut next = sections.to_vec();
    let quiz = match host {
        QuizHost::Section(si) => next.get_mut(si).map(|s| &mut s.quiz),
        QuizHost::Lecture(si, li) => next
            .get_mut(si)
            .and_then(|s| s.lectures.get_mut(li))
            .map(|l| &mut l.quiz),
    };
    if let Some(quiz) = quiz {
        f(quiz);
    }
    next
}

pub fn add_question(sections: &[Section], host: QuizHost) -> Vec<Section> {
    with_quiz(sections, host, |quiz| quiz.push(QuizQuestion::seeded()))
}

pub fn remove_question(sections: &[Section], host: QuizHost, qi: usize) -> Vec<Section> {
    with_quiz(sections, host, |quiz| {
        if qi < quiz.len() {
            quiz.remove(qi);
        }
    })
}

pub fn edit_question(
    sections: &[Section],
    host: QuizHost,
    qi: usize,
    patch: QuestionPatch,
) -> Vec<Section> {
    with_quiz(sections, host, |quiz| {
        let Some(question) = quiz.get_mut(qi) else {
            return;
        };
        if let Some(text) = patch.question {
            question.question = text;
        }
        if let Some(explanation) = patch.explanation {
            question.explanation = if explanation.is_empty() {
                None
            } else {
                Some(explanation)
            };
        }
        // An index past the current options is ignored, keeping the
        // correct-index-always-valid invariant.
        if let Some(ci) = patch.correct_index {
            if ci < question.options.len() {
                question.correct_index = ci;
            }
        }
    })
}

pub fn add_option(sections: &[Section], host: QuizHost, qi: usize) -> Vec<Section> {
    with_quiz(sections, host, |quiz| {
        if let Some(question) = quiz.get_mut(qi) {
            question.options.push(QuizOption { text: String::new() });
        }
    })
}

pub fn set_option(
    sections: &[Section],
    host: QuizHost,
    qi: usize,
    oi: usize,
    text: &str,
) -> Vec<Section> {
    with_quiz(sections, host, |quiz| {
        if let Some(option) = quiz.get_mut(qi).and_then(|q| q.options.get_mut(oi)) {
            option.text = text.to_string();
        }
    })
}

/// Removing an option re-normalizes `correct_index` so it keeps pointing at
/// a valid option: indices after the removed slot shift down with it, and
/// removing the correct option itself falls back to option 0. A question
/// never drops below two options; removal at the floor is a no-op.
pub fn remove_option(sections: &[Section], host: QuizHost, qi: usize, oi: usize) -> Vec<Section> {
    with_quiz(sections, host, |quiz| {
        let Some(question) = quiz.get_mut(qi) else {
            return;
        };
        if question.options.len() <= 2 || oi >= question.options.len() {
            return;
        }
        question.options.remove(oi);
        if oi < question.correct_index {
            question.correct_index -= 1;
        } else if oi == question.correct_index {
            question.correct_index = 0;
        }
    })
}
