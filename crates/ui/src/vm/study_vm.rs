use services::{ImageResolver, StudyFlow};

use crate::vm::format::figure_label;

#[derive(Clone, Debug, PartialEq)]
pub struct StudyFigureVm {
    pub position_label: String,
    pub figure_label: Option<String>,
    pub category_label: String,
    pub text: String,
    pub image_url: String,
    pub zoom_label: String,
    pub scale: f32,
    pub can_zoom_in: bool,
    pub can_zoom_out: bool,
    pub has_previous: bool,
    pub has_next: bool,
    pub revealed: bool,
    pub answer: String,
    pub explanation: String,
}

/// `None` when the current filter leaves nothing to show.
#[must_use]
pub fn map_study_figure(flow: &StudyFlow, images: &ImageResolver) -> Option<StudyFigureVm> {
    let question = flow.current()?;
    let zoom = flow.zoom();
    let correct = question.correct_answer();
    Some(StudyFigureVm {
        position_label: format!("Figure {} of {}", flow.index() + 1, flow.len()),
        figure_label: figure_label(question.figure_number()),
        category_label: question.category().display_name(),
        text: question.question_text().to_owned(),
        image_url: images.resolve(question),
        zoom_label: format!("{}%", zoom.percent()),
        scale: zoom.scale(),
        can_zoom_in: zoom.can_zoom_in(),
        can_zoom_out: zoom.can_zoom_out(),
        has_previous: flow.has_previous(),
        has_next: flow.has_next(),
        revealed: flow.is_revealed(),
        answer: format!("{correct}. {}", question.option(correct)),
        explanation: question.explanation().to_owned(),
    })
}
