use crate::{
    annotate, category_text, combined_text, display_document, Category, CategoryResponses,
    CategoryStatus, Document, FragmentOutcome, MatchScore, MergeEngine, ParagraphRef,
    SourceError,
};

fn merge(text: &str, responses: &CategoryResponses) -> crate::Merged {
    MergeEngine::default().merge(&Document::from_text(text), responses)
}

#[test]
fn claimant_exact_quote() {
    let responses = CategoryResponses::new().with(Category::Claimant, "<p>Ion Popescu</p>");
    let merged = merge("Subsemnatul Ion Popescu solicită anularea actului.", &responses);

    let report = merged.report.category(Category::Claimant).unwrap();
    assert_eq!(
        report.outcomes,
        vec![FragmentOutcome::Accepted {
            score: MatchScore::EXACT,
            paragraph: 1,
            location: ParagraphRef::new(0, 0),
            flagged: 2,
        }]
    );

    let flags: Vec<bool> = merged.document.pages[0].paragraphs[0]
        .words
        .iter()
        .map(|w| w.claimant)
        .collect();
    assert_eq!(flags, vec![false, true, true, false, false, false]);
    for category in Category::ALL {
        if category != Category::Claimant {
            assert_eq!(merged.document.count_flagged(category), 0, "{category}");
        }
    }
}

#[test]
fn multi_page_request() {
    let text = "TRIBUNALUL BUCUREȘTI\nDomnule Președinte,\n\u{c}Subsemnatul Ion Popescu, domiciliat în București,\nvă rog să dispuneți anularea procesului-verbal nr. 123.\n\u{c}În drept, art. 31 din OG 2/2001.";
    let responses = CategoryResponses::new()
        .with(Category::Claimant, "<p>Ion Popescu</p>")
        .with(
            Category::Request,
            "<p>vă rog să dispuneți anularea procesului verbal nr 123</p>",
        )
        .with(Category::LegalBasis, "<p>art. 31 din OG 2/2001</p><p>art. 31 din OG 2/2001</p>");
    let merged = merge(text, &responses);

    insta::assert_snapshot!(
        display_document(
            &merged.document,
            &[Category::Claimant, Category::Request, Category::LegalBasis]
        ),
        @r###"
    TRIBUNALUL  BUCUREȘTI

    Domnule  Președinte,

    Subsemnatul  Ion  Popescu,  domiciliat  în  București,
                 ╰───────────╯claimant

    vă  rog  să  dispuneți  anularea  procesului-verbal  nr.  123.
    ╰──────────────────────────────╯request
                                                         ╰───────╯request

    În  drept,  art.  31  din  OG  2/2001.
                ╰────────────────────────╯legal_basis
    "###
    );

    let legal = merged.report.category(Category::LegalBasis).unwrap();
    assert_eq!(legal.trimmed, 1);
    assert_eq!(legal.fragments, 1);
    assert_eq!(
        category_text(&merged.document, Category::Request),
        "vă rog să dispuneți anularea nr. 123."
    );
}

#[test]
fn model_input_and_annotation_round() {
    let doc = Document::from_text("Subsemnatul Ion Popescu\n\ncontra SC Alfa SRL");
    assert_eq!(
        combined_text(&doc),
        "<p> Subsemnatul Ion Popescu </p> <p> contra SC Alfa SRL </p>"
    );

    let source = |category: Category| match category {
        Category::Claimant => Ok("<p>Ion Popescu</p>".to_string()),
        Category::Respondent => Ok("<p>SC Alfa SRL</p>".to_string()),
        other => Err(SourceError::new(other, "model unavailable")),
    };
    let requested = vec!["isReclamant".to_string(), "isParat".to_string(), "isProba".to_string()];
    let merged =
        annotate(&doc, Some(requested.as_slice()), &source, &MergeEngine::default()).unwrap();

    assert_eq!(category_text(&merged.document, Category::Claimant), "Ion Popescu");
    assert_eq!(category_text(&merged.document, Category::Respondent), "SC Alfa SRL");
    let evidence = merged.report.category(Category::Evidence).unwrap();
    assert_eq!(evidence.status, CategoryStatus::Skipped);
    assert_eq!(merged.report.matched(), 2);
}

#[test]
fn json_payload_round_trip_keeps_metadata() {
    let payload = r#"{
        "id": "42",
        "documentTypeName": "Cerere de chemare în judecată",
        "pages": [{"pageNumber": 1, "paragraphs": [
            {"id": "p1", "words": [
                {"id": "w1", "text": "Ion", "left": 1, "top": 2, "width": 3, "height": 4},
                {"id": "w2", "text": "Popescu"}
            ]}
        ]}]
    }"#;
    let doc = Document::from_json(payload).unwrap();
    let responses = CategoryResponses::new().with(Category::Claimant, "<p>ion popescu</p>");
    let merged = MergeEngine::default().merge(&doc, &responses);

    let value: serde_json::Value =
        serde_json::from_str(&merged.document.to_json().unwrap()).unwrap();
    assert_eq!(value["id"], "42");
    assert_eq!(value["documentTypeName"], "Cerere de chemare în judecată");
    let words = &value["pages"][0]["paragraphs"][0]["words"];
    assert_eq!(words[0]["isReclamant"], true);
    assert_eq!(words[1]["isReclamant"], true);
    assert_eq!(words[0]["left"], 1);
    assert_eq!(words[0]["height"], 4);
}
