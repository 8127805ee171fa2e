use super::*;

use crate::frbr::FrbrUri;
use crate::pipeline::{Attachment, run_pipeline};
use crate::profiles::{self, DocumentKind, builtin_registry};
use crate::registry::Locale;
use crate::toc::{TocElement, build_toc};
use crate::tree::Node;

const LONG_OPENING: &str = "1. First paragraph of text that is long enough not to be a heading, lorum ipsum dolor sit amet consectetur.";

fn za() -> Locale {
    Locale::country("za")
}

fn tree_of(lines: &[&str]) -> Tree {
    Tree::from_paragraphs(lines.iter().map(|line| Paragraph::text(*line)))
}

fn hierarchicalize(context: Context) -> Context {
    let pipeline = builtin_registry()
        .pipeline(profiles::HIERARCHY, &za())
        .unwrap();
    run_pipeline(&pipeline, context).unwrap()
}

fn parse_lines(lines: &[&str]) -> Context {
    hierarchicalize(Context::from_tree(tree_of(lines)))
}

fn run_stages(names: &[&str], lines: &[&str]) -> Context {
    let registry = builtin_registry();
    let mut context = Context::from_tree(tree_of(lines));
    for name in names {
        registry.stage(name, &za()).unwrap().apply(&mut context).unwrap();
    }
    context
}

/// One line per node: blocks as `kind num [heading] <subheading>`, prose as
/// `| text`, remarks as `~ text`.
fn outline(tree: &Tree) -> Vec<String> {
    let mut out = Vec::new();
    render(tree, tree.root(), 0, &mut out);
    out
}

fn render(tree: &Tree, parent: NodeId, depth: usize, out: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    for child in tree.children(parent) {
        match tree.node(child) {
            Node::Block(block) => {
                let mut line = format!("{indent}{}", block.kind.as_str());
                if let Some(num) = &block.num {
                    line.push_str(&format!(" {num}"));
                }
                if let Some(heading) = &block.heading {
                    line.push_str(&format!(" [{heading}]"));
                }
                if let Some(subheading) = &block.subheading {
                    line.push_str(&format!(" <{subheading}>"));
                }
                out.push(line);
                render(tree, child, depth + 1, out);
            }
            Node::Paragraph(paragraph) => {
                let marker = match paragraph.role {
                    ParagraphRole::Prose => '|',
                    ParagraphRole::Remark => '~',
                };
                out.push(format!("{indent}{marker} {}", paragraph.plain_text()));
            }
            Node::Root => {}
        }
    }
}

fn find_block(tree: &Tree, kind: BlockKind, num: &str) -> Block {
    tree.descendants(tree.root())
        .into_iter()
        .filter_map(|id| tree.block(id))
        .find(|block| block.kind == kind && block.num.as_deref() == Some(num))
        .cloned()
        .unwrap()
}

fn ids(tree: &Tree) -> Vec<String> {
    tree.descendants(tree.root())
        .into_iter()
        .filter_map(|id| tree.block(id).and_then(|block| block.id.clone()))
        .collect()
}

#[test]
fn numbered_lines_are_recognised_before_nesting() {
    let context = run_stages(
        &["identify-sections", "identify-subsections", "identify-paragraphs"],
        &[
            LONG_OPENING,
            "1.1.1. Nested paragraph.",
            "Text text text.",
            "1.1.2 Also this one.",
            "1.1.3Not this one.",
            "123 Section",
        ],
    );

    let opening = format!("| {}", LONG_OPENING.trim_start_matches("1. "));
    assert_eq!(
        outline(&context.tree),
        vec![
            "paragraph 1",
            opening.as_str(),
            "paragraph 1.1.1",
            "| Nested paragraph.",
            "| Text text text.",
            "paragraph 1.1.2",
            "| Also this one.",
            "| 1.1.3Not this one.",
            "section 123 [Section]",
        ]
    );
    let first = find_block(&context.tree, BlockKind::Paragraph, "1");
    assert!(first.num_stop_stripped);
    let nested = find_block(&context.tree, BlockKind::Paragraph, "1.1.2");
    assert!(!nested.num_stop_stripped);
}

#[test]
fn dotted_paragraphs_nest_and_release_their_wrap_up() {
    let context = parse_lines(&[
        LONG_OPENING,
        "1.1.1. Nested paragraph.",
        "Text text text.",
        "1.1.2 Also this one.",
        "1.1.3Not this one.",
        "123 Section",
    ]);

    let opening = format!("    | {}", LONG_OPENING.trim_start_matches("1. "));
    assert_eq!(
        outline(&context.tree),
        vec![
            "body",
            "  paragraph 1",
            opening.as_str(),
            "    subparagraph 1.1.1",
            "      | Nested paragraph.",
            "      | Text text text.",
            "    subparagraph 1.1.2",
            "      | Also this one.",
            "    | 1.1.3Not this one.",
            "  section 123 [Section]",
        ]
    );
    assert_eq!(
        ids(&context.tree),
        vec![
            "para_1",
            "para_1__subpara_1.1.1",
            "para_1__subpara_1.1.2",
            "sec_123",
        ]
    );
}

#[test]
fn letter_i_after_h_stays_alphabetic_unless_roman_follows() {
    let context = parse_lines(&["(h) item", "(i) item", "(ii) item", "(i) item"]);

    assert_eq!(
        outline(&context.tree),
        vec![
            "body",
            "  paragraph (h)",
            "    | item",
            "    subparagraph (i)",
            "      | item",
            "    subparagraph (ii)",
            "      | item",
            "  paragraph (i)",
            "    | item",
        ]
    );
}

#[test]
fn classify_resolves_ambiguous_letters_from_context() {
    let alpha = NumberingFormat::LowerAlpha;
    let roman = NumberingFormat::LowerRoman;

    assert_eq!(classify_num("(i)", None, None), roman);
    assert_eq!(classify_num("(i)", Some(("(h)", alpha)), None), alpha);
    assert_eq!(classify_num("(i)", Some(("(h)", alpha)), Some("(ii)")), roman);
    assert_eq!(classify_num("(v)", Some(("(iv)", roman)), None), roman);
    assert_eq!(classify_num("(v)", Some(("(u)", alpha)), None), alpha);
    assert_eq!(classify_num("(x)", None, None), alpha);
    assert_eq!(classify_num("(iv)", None, None), roman);
    assert_eq!(classify_num("(aa)", Some(("(z)", alpha)), None), alpha);
    assert_eq!(classify_num("(aa)", None, None), NumberingFormat::DoubledLower);
    assert_eq!(classify_num("(ll)", None, None), NumberingFormat::DoubledLower);
    assert_eq!(classify_num("(II)", None, None), NumberingFormat::UpperRoman);
    assert_eq!(classify_num("1.2.3", None, None), NumberingFormat::Dotted(2));
    assert_eq!(classify_num("(aB)", None, None), NumberingFormat::Unknown);
}

#[test]
fn upper_roman_nests_under_its_letter_and_closes_before_next_letter() {
    let context = parse_lines(&[
        "(1) The Board must—",
        "(a) meet monthly;",
        "(b) keep minutes of—",
        "(I) attendance; and",
        "(II) resolutions;",
        "(c) report annually.",
    ]);

    assert_eq!(
        outline(&context.tree),
        vec![
            "body",
            "  subsection (1)",
            "    | The Board must—",
            "    paragraph (a)",
            "      | meet monthly;",
            "    paragraph (b)",
            "      | keep minutes of—",
            "      subparagraph (I)",
            "        | attendance; and",
            "      subparagraph (II)",
            "        | resolutions;",
            "    paragraph (c)",
            "      | report annually.",
        ]
    );
}

#[test]
fn annex_sections_are_demoted_to_paragraphs() {
    let context = parse_lines(&[
        "1. Heading",
        "Section body",
        "FIRST ANNEX (Sections 5(3) and (4))",
        "Body",
        "1. Heading in annex",
        "Section body in annex",
    ]);

    assert_eq!(
        outline(&context.tree),
        vec![
            "body",
            "  section 1 [Heading]",
            "    | Section body",
            "annexure [FIRST ANNEX] <(Sections 5(3) and (4))>",
            "  | Body",
            "  paragraph 1",
            "    | Heading in annex",
            "    | Section body in annex",
        ]
    );
    assert_eq!(ids(&context.tree), vec!["sec_1", "att_1", "att_1__para_1"]);
}

#[test]
fn part_takes_following_line_as_heading() {
    let context = parse_lines(&[
        "PART III",
        "ELECTIONS",
        "26. Appointment of returning officers",
        "The Commission must appoint a returning officer for each municipality.",
    ]);

    assert_eq!(
        outline(&context.tree),
        vec![
            "body",
            "  part III [ELECTIONS]",
            "    section 26 [Appointment of returning officers]",
            "      | The Commission must appoint a returning officer for each municipality.",
        ]
    );
    assert_eq!(ids(&context.tree), vec!["part_III", "part_III__sec_26"]);
}

#[test]
fn wrap_up_text_moves_out_of_last_list_entry() {
    let context = parse_lines(&[
        "(3) The Minister must—",
        "(a) publish a notice; and",
        "(b) consult the public,",
        "within 30 days.",
    ]);

    assert_eq!(
        outline(&context.tree),
        vec![
            "body",
            "  subsection (3)",
            "    | The Minister must—",
            "    paragraph (a)",
            "      | publish a notice; and",
            "    paragraph (b)",
            "      | consult the public,",
            "    | within 30 days.",
        ]
    );
}

#[test]
fn duplicate_numbers_become_an_item_list() {
    let context = parse_lines(&[
        "4. Offences",
        "The following are prohibited:",
        "(a) hunting;",
        "(b) fishing;",
        "(a) trapping.",
    ]);

    assert_eq!(
        outline(&context.tree),
        vec![
            "body",
            "  section 4 [Offences]",
            "    items",
            "      | The following are prohibited:",
            "      item (a)",
            "        | hunting;",
            "      item (b)",
            "        | fishing;",
            "      item (a)",
            "        | trapping.",
        ]
    );
    assert_eq!(
        ids(&context.tree),
        vec![
            "sec_4",
            "sec_4__list_nn_1",
            "sec_4__list_nn_1__item_a",
            "sec_4__list_nn_1__item_b",
            "sec_4__list_nn_1__item_a_2",
        ]
    );
}

#[test]
fn hierarchy_is_idempotent() {
    let inputs: [&[&str]; 4] = [
        &[LONG_OPENING, "1.1.1. Nested paragraph.", "1.1.2 Also this one.", "123 Section"],
        &["(h) item", "(i) item", "(ii) item", "(i) item"],
        &["1. Heading", "Section body", "FIRST ANNEX (Sections 5(3) and (4))", "Body", "1. Heading in annex", "Section body in annex"],
        &["PART III", "ELECTIONS", "26. Appointment of returning officers", "The Commission must act."],
    ];

    for lines in inputs {
        let once = parse_lines(lines);
        let first = once.tree.view();
        let twice = hierarchicalize(once);
        assert_eq!(twice.tree.view(), first, "re-run changed {lines:?}");
    }
}

#[test]
fn empty_container_stays_empty() {
    let context = hierarchicalize(Context::from_tree(Tree::new()));
    assert!(context.tree.view().is_empty());
}

#[test]
fn prose_only_document_is_all_preface() {
    let context = parse_lines(&["REPUBLIC OF SOUTH AFRICA", "Some introductory text."]);

    assert_eq!(
        outline(&context.tree),
        vec![
            "preface",
            "  | REPUBLIC OF SOUTH AFRICA",
            "  | Some introductory text.",
        ]
    );
    assert_eq!(ids(&context.tree), vec!["preface"]);
}

#[test]
fn preamble_line_opens_preamble_block() {
    let context = parse_lines(&[
        "Preamble",
        "WHEREAS the Constitution provides for local government;",
        "1. Definitions",
        "In this Act words have their ordinary meaning.",
    ]);

    assert_eq!(
        outline(&context.tree),
        vec![
            "preamble",
            "  | Preamble",
            "  | WHEREAS the Constitution provides for local government;",
            "body",
            "  section 1 [Definitions]",
            "    | In this Act words have their ordinary meaning.",
        ]
    );
}

#[test]
fn bare_section_number_keeps_missing_heading() {
    let context = parse_lines(&["7.", "The Minister may make regulations."]);

    assert_eq!(
        outline(&context.tree),
        vec![
            "body",
            "  section 7",
            "    | The Minister may make regulations.",
        ]
    );
    let section = find_block(&context.tree, BlockKind::Section, "7");
    assert!(section.num_stop_stripped);
    assert_eq!(section.heading, None);
}

#[test]
fn heading_line_above_bare_section_becomes_its_heading() {
    let context = parse_lines(&[
        "Short title",
        "12. The Minister may, by notice in the Gazette, make regulations on any matter in this Act.",
    ]);

    assert_eq!(
        outline(&context.tree),
        vec![
            "body",
            "  section 12 [Short title]",
            "    | The Minister may, by notice in the Gazette, make regulations on any matter in this Act.",
        ]
    );
}

#[test]
fn first_subsection_on_section_line_opens_its_body() {
    let context = parse_lines(&[
        "62. (1) For the purposes of this Act a municipality includes a district council.",
        "(2) The Minister may exempt a municipality.",
    ]);

    assert_eq!(
        outline(&context.tree),
        vec![
            "body",
            "  section 62",
            "    subsection (1)",
            "      | For the purposes of this Act a municipality includes a district council.",
            "    subsection (2)",
            "      | The Minister may exempt a municipality.",
        ]
    );
    let section = find_block(&context.tree, BlockKind::Section, "62");
    assert!(section.num_stop_stripped);
    assert_eq!(section.heading, None);
}

#[test]
fn inline_heading_ends_at_first_subsection() {
    let context = parse_lines(&[
        "3 Application of Act (1) This Act applies to every municipality in the Republic.",
        "(2) It binds the State.",
    ]);

    assert_eq!(
        outline(&context.tree),
        vec![
            "body",
            "  section 3 [Application of Act]",
            "    subsection (1)",
            "      | This Act applies to every municipality in the Republic.",
            "    subsection (2)",
            "      | It binds the State.",
        ]
    );
}

#[test]
fn cross_reference_to_subsection_stays_in_section_body() {
    let context = parse_lines(&[
        "Powers of Minister",
        "4. (1) The Minister may make rules.",
        "(2) Rules must be published.",
        "5. Subject to subsection (1) of section 4 the Minister may delegate powers to any official in the department.",
        "6. As provided in subsection (1) Rules must be tabled in Parliament within thirty days of publication.",
    ]);

    assert_eq!(
        outline(&context.tree),
        vec![
            "body",
            "  section 4 [Powers of Minister]",
            "    subsection (1)",
            "      | The Minister may make rules.",
            "    subsection (2)",
            "      | Rules must be published.",
            "  section 5",
            "    | Subject to subsection (1) of section 4 the Minister may delegate powers to any official in the department.",
            "  section 6",
            "    | As provided in subsection (1) Rules must be tabled in Parliament within thirty days of publication.",
        ]
    );
}

#[test]
fn centred_or_bold_line_above_number_heads_the_section() {
    let tree = Tree::from_paragraphs([
        Paragraph::text("Commencement.").centered(),
        Paragraph::text(
            "14. This Act comes into operation on a date fixed by the President by proclamation in the Gazette.",
        ),
        Paragraph::bold("Offences and penalties."),
        Paragraph::text(
            "15. Any person who contravenes section 4 is guilty of an offence and liable on conviction to a fine.",
        ),
    ]);
    let context = hierarchicalize(Context::from_tree(tree));

    assert_eq!(
        outline(&context.tree),
        vec![
            "body",
            "  section 14 [Commencement]",
            "    | This Act comes into operation on a date fixed by the President by proclamation in the Gazette.",
            "  section 15 [Offences and penalties]",
            "    | Any person who contravenes section 4 is guilty of an offence and liable on conviction to a fine.",
        ]
    );
    assert!(find_block(&context.tree, BlockKind::Section, "14").stop_stripped);

    let plain = parse_lines(&[
        "Commencement.",
        "14. This Act comes into operation on a date fixed by the President by proclamation in the Gazette.",
    ]);
    assert_eq!(plain.tree.count_blocks(BlockKind::Section), 0);
}

#[test]
fn part_seen_first_contains_chapters() {
    let context = parse_lines(&[
        "PART 1 - General",
        "CHAPTER 1 - Definitions",
        "1. Interpretation",
        "In this Act words have their ordinary meaning.",
        "CHAPTER 2 - Rates",
        "2. Levy of rates",
        "A municipality may levy rates on property.",
        "PART 2 - Finance",
        "CHAPTER 3 - Budgets",
        "3. Annual budget",
        "The council must approve an annual budget.",
    ]);

    assert_eq!(
        outline(&context.tree),
        vec![
            "body",
            "  part 1 [General]",
            "    chapter 1 [Definitions]",
            "      section 1 [Interpretation]",
            "        | In this Act words have their ordinary meaning.",
            "    chapter 2 [Rates]",
            "      section 2 [Levy of rates]",
            "        | A municipality may levy rates on property.",
            "  part 2 [Finance]",
            "    chapter 3 [Budgets]",
            "      section 3 [Annual budget]",
            "        | The council must approve an annual budget.",
        ]
    );
}

#[test]
fn subpart_contains_articles_regardless_of_order() {
    let context = parse_lines(&[
        "ARTICLE 1 - Scope",
        "This Regulation applies to every licensed operator.",
        "SUBPART A - Licensing",
        "ARTICLE 2 - Applications",
        "An application must be made in the prescribed form.",
        "ARTICLE 3 - Renewals",
        "A licence may be renewed once.",
    ]);

    assert_eq!(
        outline(&context.tree),
        vec![
            "body",
            "  article 1 [Scope]",
            "    | This Regulation applies to every licensed operator.",
            "  subpart A [Licensing]",
            "    article 2 [Applications]",
            "      | An application must be made in the prescribed form.",
            "    article 3 [Renewals]",
            "      | A licence may be renewed once.",
        ]
    );
}

#[test]
fn heading_stop_is_recorded() {
    let context = parse_lines(&["CHAPTER 2 - Taxation.", "3. Rates.", "Rates are payable."]);

    let chapter = find_block(&context.tree, BlockKind::Chapter, "2");
    assert_eq!(chapter.heading.as_deref(), Some("Taxation"));
    assert!(chapter.stop_stripped);
    let section = find_block(&context.tree, BlockKind::Section, "3");
    assert_eq!(section.heading.as_deref(), Some("Rates"));
    assert!(section.stop_stripped);
    assert!(section.num_stop_stripped);
}

#[test]
fn cleaning_strips_structural_punctuation() {
    assert_eq!(clean_num("12."), ("12".to_string(), true));
    assert_eq!(clean_num(" 4A: "), ("4A".to_string(), false));
    assert_eq!(clean_num("III—"), ("III".to_string(), false));
    assert_eq!(clean_heading("— Definitions."), ("Definitions".to_string(), true));
    assert_eq!(clean_heading("Forms"), ("Forms".to_string(), false));
    assert!(is_plausible_heading("Application of Act"));
    assert!(!is_plausible_heading("the Minister may—"));
    assert!(!is_plausible_heading("Powers:"));
}

#[test]
fn lowercase_keyword_heading_stays_prose() {
    let context = run_stages(&["identify-chapters"], &["Chapter 4 deals with appeals."]);

    assert_eq!(outline(&context.tree), vec!["| Chapter 4 deals with appeals."]);
}

#[test]
fn keyword_line_ending_on_separator_takes_next_heading() {
    let context = run_stages(&["identify-parts"], &["PART 2 -", "General Provisions", "Text."]);

    assert_eq!(
        outline(&context.tree),
        vec!["part 2 [General Provisions]", "| Text."]
    );
}

#[test]
fn fragments_get_no_front_matter_or_body() {
    let mut context = Context::from_tree(tree_of(&["3. Application", "This Act applies."]));
    context.fragment = Some("section".to_string());
    let context = hierarchicalize(context);

    assert_eq!(
        outline(&context.tree),
        vec!["section 3 [Application]", "  | This Act applies."]
    );
}

#[test]
fn repeated_numbers_get_suffixed_ids() {
    let context = parse_lines(&[
        "5. Short title",
        "This Act is the Rates Act.",
        "5. Commencement",
        "This Act comes into force on publication.",
    ]);

    assert_eq!(ids(&context.tree), vec!["sec_5", "sec_5_2"]);
}

#[test]
fn prose_after_first_block_fails_validation() {
    let mut tree = Tree::new();
    let root = tree.root();
    let section = tree.new_block(Block::new(BlockKind::Section).with_num("1"));
    tree.append_child(root, section);
    let stray = tree.new_paragraph(Paragraph::text("Stray text"));
    tree.append_child(root, stray);

    let mut context = Context::from_tree(tree);
    let err = ValidateTree.apply(&mut context).unwrap_err();
    match err {
        Error::ParseFailure {
            stage, position, ..
        } => {
            assert_eq!(stage, "validate-tree");
            assert_eq!(position.as_deref(), Some("child 1"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn image_sources_must_resolve_to_attachments() {
    let image = Paragraph {
        src: Some("map.png".to_string()),
        ..Paragraph::default()
    };
    let tree = || Tree::from_paragraphs([Paragraph::text("Plan"), image.clone()]);

    let mut missing = Context::from_tree(tree());
    assert!(matches!(
        ValidateTree.apply(&mut missing),
        Err(Error::ParseFailure { .. })
    ));

    let mut present = Context::from_tree(tree());
    present.attachments.push(Attachment {
        name: "map.png".to_string(),
        mime_type: "image/png".to_string(),
        data: vec![0x89, 0x50],
    });
    assert!(ValidateTree.apply(&mut present).is_ok());
}

#[test]
fn debate_speeches_and_remarks() {
    let uri = FrbrUri::parse("/akn/za/debaterecord/2014-03-12/1").unwrap();
    let kind = DocumentKind::for_uri(Some(&uri));
    assert_eq!(kind, DocumentKind::Debate);

    let pipeline = builtin_registry().pipeline(kind.hierarchy(), &uri.locale()).unwrap();
    let context = Context::from_tree(tree_of(&[
        "Wednesday, 12 March 2014",
        "HON. J SMITH [ANC]: Madam Speaker, I rise.",
        "(Applause)",
        "THE SPEAKER: Order!",
    ]))
    .with_frbr_uri(uri);
    let context = run_pipeline(&pipeline, context).unwrap();

    assert_eq!(
        outline(&context.tree),
        vec![
            "preface",
            "  | Wednesday, 12 March 2014",
            "body",
            "  debatesection",
            "    speech [HON. J SMITH [ANC]]",
            "      | Madam Speaker, I rise.",
            "      ~ (Applause)",
            "    speech [THE SPEAKER]",
            "      | Order!",
        ]
    );
    assert_eq!(
        ids(&context.tree),
        vec![
            "preface",
            "dbsect_nn_1",
            "dbsect_nn_1__speech_nn_1",
            "dbsect_nn_1__speech_nn_2",
        ]
    );
}

#[test]
fn toc_paths_disambiguate_repeated_parts() {
    let context = parse_lines(&[
        "CHAPTER 1 - Administration",
        "PART 1 - General",
        "1. Definitions",
        "In this Act words have their ordinary meaning.",
        "CHAPTER 2 - Finance",
        "PART 1 - Budgets",
        "2.",
        "The Minister tables the budget.",
    ]);
    let toc = build_toc(&builtin_registry(), &context.tree, &za()).unwrap();

    let flat = toc
        .iter()
        .flat_map(TocElement::walk)
        .map(|element| {
            (
                element.title.as_str(),
                element.subcomponent.as_deref().unwrap_or(""),
                element.component.as_str(),
            )
        })
        .collect::<Vec<_>>();
    assert_eq!(
        flat,
        vec![
            ("Chapter 1 - Administration", "chapter/1", "main"),
            ("Part 1 - General", "chapter/1/part/1", "main"),
            ("1. Definitions", "section/1", "main"),
            ("Chapter 2 - Finance", "chapter/2", "main"),
            ("Part 1 - Budgets", "chapter/2/part/1", "main"),
            ("Section 2", "section/2", "main"),
        ]
    );

    let unheaded = toc[1].walk()[2];
    assert_eq!(unheaded.heading, "Section 2");
    assert_eq!(unheaded.id.as_deref(), Some("chp_2__part_1__sec_2"));
}

#[test]
fn toc_lists_attachments_as_components() {
    let context = parse_lines(&[
        "1. Heading",
        "Section body",
        "SCHEDULE 1",
        "Forms",
        "1. Application form",
        "Complete in full.",
        "SCHEDULE 2 - Fees",
        "Fees are listed below.",
    ]);
    let toc = build_toc(&builtin_registry(), &context.tree, &za()).unwrap();

    let titles = toc
        .iter()
        .map(|element| (element.title.as_str(), element.component.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(
        titles,
        vec![
            ("1. Heading", "main"),
            ("SCHEDULE 1 - Forms", "schedule1"),
            ("SCHEDULE 2 - Fees", "schedule2"),
        ]
    );
    assert!(toc[1].children.is_empty());
}

#[test]
fn builtin_pipelines_resolve_for_any_locale() {
    let registry = builtin_registry();
    for locale in [za(), Locale::country("ke"), Locale::any()] {
        for name in [profiles::NORMALISE, profiles::HIERARCHY, profiles::DEBATE_HIERARCHY] {
            let pipeline = registry.pipeline(name, &locale).unwrap();
            assert_eq!(
                pipeline.stage_names(),
                registry.pipeline_stages(name, &locale).unwrap().to_vec()
            );
        }
    }
    assert_eq!(DocumentKind::for_uri(None), DocumentKind::Act);
}
