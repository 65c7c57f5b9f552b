//! Built-in chapter 1 questions used when no data files can be read.

use quiz_core::model::{Question, QuestionDraft};

struct Fixture {
    id: &'static str,
    figure: &'static str,
    text: &'static str,
    options: [&'static str; 4],
    answer: &'static str,
    explanation: &'static str,
    category: &'static str,
    difficulty: &'static str,
}

const FIXTURES: [Fixture; 4] = [
    Fixture {
        id: "fixture-1",
        figure: "1.1",
        text: "Which developmental anomaly shows a notch-like defect of the inferior iris?",
        options: ["Aniridia", "Coloboma", "Persistent fetal vasculature", "Cyclopia"],
        answer: "B",
        explanation: "A coloboma results from incomplete closure of the embryonic fissure, \
                      classically inferonasal.",
        category: "developmental_anomaly",
        difficulty: "easy",
    },
    Fixture {
        id: "fixture-2",
        figure: "1.2",
        text: "Which cell type predominates in acute suppurative endophthalmitis?",
        options: ["Lymphocyte", "Plasma cell", "Neutrophil", "Epithelioid histiocyte"],
        answer: "C",
        explanation: "Acute suppurative inflammation is dominated by neutrophils.",
        category: "inflammation",
        difficulty: "medium",
    },
    Fixture {
        id: "fixture-3",
        figure: "1.3",
        text: "Band keratopathy is caused by deposition of which material?",
        options: ["Calcium", "Amyloid", "Lipid", "Iron"],
        answer: "A",
        explanation: "Calcium hydroxyapatite deposits in Bowman layer produce band keratopathy.",
        category: "dystrophy_and_degeneration",
        difficulty: "medium",
    },
    Fixture {
        id: "fixture-4",
        figure: "1.4",
        text: "Flexner-Wintersteiner rosettes are characteristic of which tumor?",
        options: ["Uveal melanoma", "Medulloepithelioma", "Lymphoma", "Retinoblastoma"],
        answer: "D",
        explanation: "Flexner-Wintersteiner rosettes indicate photoreceptor differentiation \
                      in retinoblastoma.",
        category: "neoplasia",
        difficulty: "hard",
    },
];

/// The fixture set, one question per default category.
#[must_use]
pub fn fixture_questions() -> Vec<Question> {
    FIXTURES
        .iter()
        .filter_map(|f| {
            let [a, b, c, d] = f.options;
            Question::new(QuestionDraft {
                id: f.id.to_owned(),
                figure_number: Some(f.figure.to_owned()),
                question_text: f.text.to_owned(),
                image_url: None,
                option_a: a.to_owned(),
                option_b: b.to_owned(),
                option_c: c.to_owned(),
                option_d: d.to_owned(),
                correct_answer: f.answer.to_owned(),
                explanation: f.explanation.to_owned(),
                chapter: "1".to_owned(),
                category: Some(f.category.to_owned()),
                difficulty: Some(f.difficulty.to_owned()),
                is_sample: true,
            })
            .ok()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::Category;
    use std::collections::HashSet;

    #[test]
    fn every_fixture_is_valid_and_covers_default_categories() {
        let questions = fixture_questions();
        assert_eq!(questions.len(), FIXTURES.len());

        let categories: HashSet<&Category> = questions.iter().map(Question::category).collect();
        for default in Category::defaults() {
            assert!(categories.contains(&default), "missing {default}");
        }
        assert!(questions.iter().all(Question::is_sample));
    }
}
