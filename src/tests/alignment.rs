use crate::{
    find_contiguous_matches, score_paragraph, select_best_paragraph, Category, CategoryResponses,
    Document, FragmentOutcome, MatchConfig, MatchScore, MergeEngine, ParagraphMapping,
};

fn flags(document: &Document, category: Category) -> Vec<Vec<bool>> {
    document
        .pages
        .iter()
        .flat_map(|page| page.paragraphs.iter())
        .map(|paragraph| paragraph.words.iter().map(|w| w.flag(category)).collect())
        .collect()
}

#[test]
fn punctuation_and_case_are_folded() {
    let fragment = "Contractul, nr. 5";
    let plain = ["Contractul", "nr", "5", "din", "2019"];
    let shouted = ["contractul", "NR.", "5", "din", "2019"];

    let a = find_contiguous_matches(fragment, &plain);
    let b = find_contiguous_matches(fragment, &shouted);
    assert_eq!(a, b);
    assert_eq!(a.into_iter().collect::<Vec<_>>(), vec![0, 1, 2]);
    assert_eq!(score_paragraph(fragment, &plain), score_paragraph(fragment, &shouted));
    assert!((score_paragraph(fragment, &plain).value() - 0.6).abs() < 1e-9);
}

#[test]
fn diacritics_are_not_folded() {
    let words = ["parat", "Pârât"];
    let matched = find_contiguous_matches("pârât", &words);
    assert_eq!(matched.into_iter().collect::<Vec<_>>(), vec![1]);
}

#[test]
fn dropped_connectives_recover_both_runs() {
    let words: Vec<&str> = "reclamantul a depus la dosar contractul de vânzare din 2019"
        .split_whitespace()
        .collect();
    let matched = find_contiguous_matches("reclamantul a depus contractul de vânzare", &words);
    assert_eq!(matched.into_iter().collect::<Vec<_>>(), vec![0, 1, 2, 5, 6, 7]);
}

#[test]
fn equal_scores_pick_the_earlier_paragraph() {
    let doc = Document::from_text("proba cu martori\nalte lucruri\nproba cu acte");
    let mapping = ParagraphMapping::build(&doc);
    let best = select_best_paragraph("proba cu", &mapping, &doc).unwrap().unwrap();
    assert_eq!(best.number, 1);

    let responses = CategoryResponses::new().with(Category::Evidence, "<p>PROBA CU</p>");
    let merged = MergeEngine::default().merge(&doc, &responses);
    assert_eq!(
        flags(&merged.document, Category::Evidence),
        vec![
            vec![true, true, false],
            vec![false, false],
            vec![false, false, false]
        ]
    );
}

#[test]
fn incidental_stopword_is_rejected() {
    let doc = Document::from_text(
        "Instanța a constatat că procesul verbal de contravenție a fost întocmit cu respectarea dispozițiilor legale în vigoare",
    );
    let responses = CategoryResponses::new().with(Category::SelectedFacts, "<p>Cu,</p>");
    let merged = MergeEngine::default().merge(&doc, &responses);

    assert_eq!(merged.document.count_flagged(Category::SelectedFacts), 0);
    let report = merged.report.category(Category::SelectedFacts).unwrap();
    match &report.outcomes[..] {
        [FragmentOutcome::Rejected { score, paragraph }] => {
            assert!(score.value() <= 0.1);
            assert_eq!(*paragraph, Some(1));
        }
        other => panic!("unexpected outcomes: {other:?}"),
    }
}

#[test]
fn threshold_is_configurable() {
    let doc = Document::from_text("a b c d e f g h i j k l");
    let responses = CategoryResponses::new().with(Category::Evidence, "<p>zz b yy</p>");

    let default = MergeEngine::default().merge(&doc, &responses);
    assert_eq!(default.document.count_flagged(Category::Evidence), 0);

    let lenient = MergeEngine::new(MatchConfig::new().with_threshold(0.05)).merge(&doc, &responses);
    assert_eq!(lenient.document.count_flagged(Category::Evidence), 1);
}

#[test]
fn best_paragraph_beats_first_plausible() {
    let doc = Document::from_text(
        "Ion a venit\nPopescu\nSubsemnatul Ion Popescu domiciliat in Cluj",
    );
    let responses =
        CategoryResponses::new().with(Category::Claimant, "<p>ion popescu domiciliat</p>");
    let merged = MergeEngine::default().merge(&doc, &responses);
    assert_eq!(
        flags(&merged.document, Category::Claimant),
        vec![
            vec![false, false, false],
            vec![false],
            vec![false, true, true, true, false, false]
        ]
    );
}

#[test]
fn short_heading_does_not_capture_long_quote() {
    let doc = Document::from_text(
        "Reclamant\nReclamant Ion Popescu domiciliat în Cluj solicită anularea",
    );
    let responses = CategoryResponses::new()
        .with(Category::Claimant, "<p>reclamant Ion Popescu domiciliat în Cluj</p>");
    let merged = MergeEngine::default().merge(&doc, &responses);

    let report = merged.report.category(Category::Claimant).unwrap();
    match &report.outcomes[..] {
        [FragmentOutcome::Accepted { score, paragraph, .. }] => {
            assert_eq!(*paragraph, 2);
            assert!((score.value() - 0.75).abs() < 1e-9);
        }
        other => panic!("unexpected outcomes: {other:?}"),
    }
    assert_eq!(
        flags(&merged.document, Category::Claimant),
        vec![
            vec![false],
            vec![true, true, true, true, true, true, false, false]
        ]
    );
}

#[test]
fn fragment_longer_than_every_paragraph_is_rejected() {
    let doc = Document::from_text("Ion Popescu\nSC Alfa SRL");
    let responses = CategoryResponses::new().with(
        Category::Claimant,
        "<p>Ion Popescu domiciliat în Cluj a chemat în judecată pe SC Alfa SRL</p>",
    );
    let merged = MergeEngine::default().merge(&doc, &responses);

    let report = merged.report.category(Category::Claimant).unwrap();
    assert_eq!(
        report.outcomes,
        vec![FragmentOutcome::Rejected {
            score: MatchScore::ZERO,
            paragraph: None,
        }]
    );
    assert_eq!(merged.document.count_flagged(Category::Claimant), 0);
}

#[test]
fn only_matched_words_in_the_paragraph_are_flagged() {
    let doc = Document::from_text("Subsemnatul Ion Popescu domiciliat in Cluj\nIon Popescu");
    let responses =
        CategoryResponses::new().with(Category::Claimant, "<p>ion popescu cnp 1800101</p>");
    let merged = MergeEngine::default().merge(&doc, &responses);
    assert_eq!(
        flags(&merged.document, Category::Claimant),
        vec![vec![false, true, true, false, false, false], vec![false, false]]
    );
}
