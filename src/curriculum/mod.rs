//! Structural operations over the curriculum tree.
//!
//! Every operation is a pure transform: it takes the current document slice
//! and returns a new one, leaving the input untouched. Out-of-range indices
//! return the document unchanged instead of panicking, so callers never have
//! to pre-validate a stale index.

pub mod quiz;

use serde::Deserialize;

use crate::models::{Basics, Lecture, Resource, Section, VideoRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Up,
    Down,
}

impl Move {
    fn target(self, from: usize) -> Option<usize> {
        match self {
            Move::Up => from.checked_sub(1),
            Move::Down => from.checked_add(1),
        }
    }
}

fn with_section(sections: &[Section], si: usize, f: impl FnOnce(&mut Section)) -> Vec<Section> {
    let mut next = sections.to_vec();
    if let Some(section) = next.get_mut(si) {
        f(section);
    }
    next
}

fn with_lecture(
    sections: &[Section],
    si: usize,
    li: usize,
    f: impl FnOnce(&mut Lecture),
) -> Vec<Section> {
    with_section(sections, si, |section| {
        if let Some(lecture) = section.lectures.get_mut(li) {
            f(lecture);
        }
    })
}

fn swap_adjacent<T: Clone>(items: &[T], from: usize, dir: Move) -> Vec<T> {
    let mut next = items.to_vec();
    if let Some(to) = dir.target(from) {
        if from < next.len() && to < next.len() {
            next.swap(from, to);
        }
    }
    next
}

fn blank_to_none(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/* ===== sections ===== */

pub fn add_section(sections: &[Section]) -> Vec<Section> {
    let mut next = sections.to_vec();
    next.push(Section::titled(format!("Section {}", next.len() + 1)));
    next
}

pub fn remove_section(sections: &[Section], si: usize) -> Vec<Section> {
    let mut next = sections.to_vec();
    if si < next.len() {
        next.remove(si);
    }
    next
}

pub fn rename_section(sections: &[Section], si: usize, title: &str) -> Vec<Section> {
    with_section(sections, si, |section| section.title = title.to_string())
}

pub fn move_section(sections: &[Section], si: usize, dir: Move) -> Vec<Section> {
    swap_adjacent(sections, si, dir)
}

pub fn set_section_notes(sections: &[Section], si: usize, notes: &str) -> Vec<Section> {
    with_section(sections, si, |section| section.notes = blank_to_none(notes))
}

pub fn set_section_doubts(sections: &[Section], si: usize, allow: bool) -> Vec<Section> {
    with_section(sections, si, |section| section.allow_doubts = allow)
}

pub fn push_section_resource(sections: &[Section], si: usize, resource: Resource) -> Vec<Section> {
    with_section(sections, si, |section| section.resources.push(resource))
}

pub fn remove_section_resource(sections: &[Section], si: usize, ri: usize) -> Vec<Section> {
    with_section(sections, si, |section| {
        if ri < section.resources.len() {
            section.resources.remove(ri);
        }
    })
}

/* ===== lectures ===== */

pub fn add_lecture(sections: &[Section], si: usize) -> Vec<Section> {
    with_section(sections, si, |section| {
        let title = format!("Lecture {}", section.lectures.len() + 1);
        section.lectures.push(Lecture::titled(title));
    })
}

pub fn remove_lecture(sections: &[Section], si: usize, li: usize) -> Vec<Section> {
    with_section(sections, si, |section| {
        if li < section.lectures.len() {
            section.lectures.remove(li);
        }
    })
}

pub fn rename_lecture(sections: &[Section], si: usize, li: usize, title: &str) -> Vec<Section> {
    with_lecture(sections, si, li, |lecture| lecture.title = title.to_string())
}

pub fn move_lecture(sections: &[Section], si: usize, li: usize, dir: Move) -> Vec<Section> {
    with_section(sections, si, |section| {
        section.lectures = swap_adjacent(&section.lectures, li, dir);
    })
}

pub fn set_lecture_description(
    sections: &[Section],
    si: usize,
    li: usize,
    text: &str,
) -> Vec<Section> {
    with_lecture(sections, si, li, |lecture| {
        lecture.description = blank_to_none(text);
    })
}

pub fn set_lecture_notes(sections: &[Section], si: usize, li: usize, notes: &str) -> Vec<Section> {
    with_lecture(sections, si, li, |lecture| lecture.notes = blank_to_none(notes))
}

pub fn set_lecture_preview(sections: &[Section], si: usize, li: usize, on: bool) -> Vec<Section> {
    with_lecture(sections, si, li, |lecture| lecture.is_free_preview = on)
}

pub fn set_lecture_doubts(sections: &[Section], si: usize, li: usize, allow: bool) -> Vec<Section> {
    with_lecture(sections, si, li, |lecture| lecture.allow_doubts = allow)
}

pub fn set_lecture_duration(
    sections: &[Section],
    si: usize,
    li: usize,
    duration_sec: Option<u32>,
) -> Vec<Section> {
    with_lecture(sections, si, li, |lecture| lecture.duration_sec = duration_sec)
}

pub fn set_lecture_video(sections: &[Section], si: usize, li: usize, video: VideoRef) -> Vec<Section> {
    with_lecture(sections, si, li, |lecture| lecture.video = Some(video))
}

pub fn push_lecture_resource(
    sections: &[Section],
    si: usize,
    li: usize,
    resource: Resource,
) -> Vec<Section> {
    with_lecture(sections, si, li, |lecture| lecture.resources.push(resource))
}

pub fn remove_lecture_resource(
    sections: &[Section],
    si: usize,
    li: usize,
    ri: usize,
) -> Vec<Section> {
    with_lecture(sections, si, li, |lecture| {
        if ri < lecture.resources.len() {
            lecture.resources.remove(ri);
        }
    })
}

/* ===== basics lists ===== */

pub fn add_outcome(basics: &Basics) -> Basics {
    let mut next = basics.clone();
    next.outcome_bullets.push(String::new());
    next
}

pub fn set_outcome(basics: &Basics, i: usize, text: &str) -> Basics {
    let mut next = basics.clone();
    if let Some(slot) = next.outcome_bullets.get_mut(i) {
        *slot = text.to_string();
    }
    next
}

pub fn remove_outcome(basics: &Basics, i: usize) -> Basics {
    let mut next = basics.clone();
    if i < next.outcome_bullets.len() {
        next.outcome_bullets.remove(i);
    }
    next
}

pub fn add_requirement(basics: &Basics) -> Basics {
    let mut next = basics.clone();
    next.requirements.push(String::new());
    next
}

pub fn set_requirement(basics: &Basics, i: usize, text: &str) -> Basics {
    let mut next = basics.clone();
    if let Some(slot) = next.requirements.get_mut(i) {
        *slot = text.to_string();
    }
    next
}

pub fn remove_requirement(basics: &Basics, i: usize) -> Basics {
    let mut next = basics.clone();
    if i < next.requirements.len() {
        next.requirements.remove(i);
    }
    next
}
