//! End-to-end projection scenarios.

use lattice_projection::{
    AnalysisResult, CategoryKind, FeatureSet, GraphLayer, IobTag, ProjectionConfig, Projector,
    PropertyResolver, StringPool,
};

fn empty_properties() -> PropertyResolver {
    PropertyResolver::new()
}

#[test]
fn test_empty_input_yields_empty_document() {
    let mut pool = StringPool::new();
    let result = AnalysisResult::build(&mut pool, "eng").build();

    let properties = empty_properties();
    let projector = Projector::new(&pool, &properties);
    let doc = projector.project(&result);

    assert!(!doc.error());
    assert_eq!(doc.len(), 0);
    assert!(doc.sentences().is_empty());
    assert_eq!(doc.language(), "eng");
}

#[test]
fn test_plain_tokens_have_default_fields() {
    // No annotations attached, no dependency data: every token comes
    // out untagged and headless.
    let mut pool = StringPool::new();
    let mut builder = AnalysisResult::build(&mut pool, "eng");
    builder.push_word("Paris", "Paris");
    builder.push_word("is", "be");
    builder.push_word("nice", "nice");
    let result = builder.build();

    let properties = empty_properties();
    let projector = Projector::new(&pool, &properties);
    let doc = projector.project(&result);

    assert!(!doc.error());
    assert_eq!(doc.len(), 3);
    for token in doc.iter() {
        assert_eq!(token.entity_type, "_");
        assert_eq!(token.iob, IobTag::Outside);
        assert_eq!(token.head, 0);
        assert_eq!(token.relation, "_");
        assert_eq!(token.features, "_");
    }
    // The lazily built dependency graph is registered back.
    assert!(result.dependency_graph().is_some());
}

#[test]
fn test_token_indices_are_contiguous() {
    let mut pool = StringPool::new();
    let mut builder = AnalysisResult::build(&mut pool, "eng");
    for word in ["a", "b", "c", "d", "e"] {
        builder.push_word(word, word);
    }
    let result = builder.build();

    let properties = empty_properties();
    let projector = Projector::new(&pool, &properties);
    let doc = projector.project(&result);

    let indices: Vec<usize> = doc.iter().map(|t| t.index).collect();
    assert_eq!(indices, (0..5).collect::<Vec<_>>());
}

#[test]
fn test_dependency_resolution_and_root_forcing() {
    // SurfaceGraph = [head, "Paris", "is", "nice", tail];
    // "Paris" -> "is" (nsubj), "nice" -> "is" (root).
    let mut pool = StringPool::new();
    let mut builder = AnalysisResult::build(&mut pool, "eng");
    let paris = builder.push_word("Paris", "Paris");
    let is = builder.push_word("is", "be");
    let nice = builder.push_word("nice", "nice");
    builder.add_dependency(paris, is, "nsubj");
    builder.add_dependency(nice, is, "root");
    let result = builder.build();

    let properties = empty_properties();
    let projector = Projector::new(&pool, &properties);
    let doc = projector.project(&result);

    assert!(!doc.error());
    assert_eq!(doc.len(), 3);

    assert_eq!(doc[0].text, "Paris");
    assert_eq!(doc[0].head, 1);
    assert_eq!(doc[0].relation, "nsubj");

    assert_eq!(doc[1].text, "is");
    assert_eq!(doc[1].head, 0);
    assert_eq!(doc[1].relation, "_");

    // The root label forces head 0 even though the edge targets "is".
    assert_eq!(doc[2].text, "nice");
    assert_eq!(doc[2].head, 0);
    assert_eq!(doc[2].relation, "root");
}

#[test]
fn test_no_dangling_heads() {
    let mut pool = StringPool::new();
    let mut builder = AnalysisResult::build(&mut pool, "eng");
    let a = builder.push_word("the", "the");
    let b = builder.push_word("cat", "cat");
    let c = builder.push_word("sleeps", "sleep");
    builder.add_dependency(a, b, "det");
    builder.add_dependency(b, c, "nsubj");
    builder.add_dependency(c, c, "root");
    let result = builder.build();

    let properties = empty_properties();
    let projector = Projector::new(&pool, &properties);
    let doc = projector.project(&result);

    for token in doc.iter() {
        assert!(token.head < doc.len());
    }
}

#[test]
fn test_relation_remapping() {
    let mut pool = StringPool::new();
    let mut builder = AnalysisResult::build(&mut pool, "fre");
    let le = builder.push_word("le", "le");
    let chat = builder.push_word("chat", "chat");
    builder.add_dependency(le, chat, "DET_N");
    builder.add_dependency(chat, chat, "ROOT");
    let result = builder.build();

    let properties = empty_properties();
    let config = ProjectionConfig::new()
        .with_relation_alias("DET_N", "det")
        .with_relation_alias("ROOT", "root");
    let projector = Projector::new(&pool, &properties).with_config(config);
    let doc = projector.project(&result);

    assert_eq!(doc[0].relation, "det");
    assert_eq!(doc[0].head, 1);
    // Remapped name equals the root label: head forced to 0.
    assert_eq!(doc[1].relation, "root");
    assert_eq!(doc[1].head, 0);
}

#[test]
fn test_surface_entity_bio_tagging() {
    // "New York" spans two surface vertices under one LOC annotation.
    let mut pool = StringPool::new();
    let mut builder = AnalysisResult::build(&mut pool, "eng");
    let new = builder.push_word("New", "new");
    let york = builder.push_word("York", "york");
    builder.push_word("is", "be");
    builder.attach_entity(GraphLayer::Surface, new, "LOC", vec![new, york]);
    let result = builder.build();

    let properties = empty_properties();
    let projector = Projector::new(&pool, &properties);
    let doc = projector.project(&result);

    assert!(!doc.error());
    assert_eq!(doc.len(), 3);
    assert_eq!(doc[0].iob, IobTag::Begin);
    assert_eq!(doc[0].entity_type, "LOC");
    assert_eq!(doc[1].iob, IobTag::Inside);
    assert_eq!(doc[1].entity_type, "LOC");
    assert_eq!(doc[2].iob, IobTag::Outside);
    assert_eq!(doc[2].entity_type, "_");
    assert_eq!((doc[0].index, doc[1].index), (0, 1));
}

#[test]
fn test_lattice_entity_expansion() {
    // The surface graph holds one merged vertex whose lattice
    // correspondent carries the entity; members are lattice vertices
    // with their own morphological data.
    let mut pool = StringPool::new();
    let mut builder = AnalysisResult::build(&mut pool, "eng");
    let merged = builder.push_word("New_York", "New_York");
    let after = builder.push_word("is", "be");
    let twin = builder.lattice_twin(merged).unwrap();
    let new = builder.add_lattice_word("New", "new", 0, None);
    let york = builder.add_lattice_word("York", "york", 4, None);
    builder.attach_entity(GraphLayer::Lattice, twin, "LOC", vec![new, york]);
    builder.add_dependency(after, after, "root");
    let result = builder.build();

    let properties = empty_properties();
    let projector = Projector::new(&pool, &properties);
    let doc = projector.project(&result);

    assert!(!doc.error());
    assert_eq!(doc.len(), 3);
    assert_eq!(doc[0].text, "New");
    assert_eq!(doc[0].iob, IobTag::Begin);
    assert_eq!(doc[1].text, "York");
    assert_eq!(doc[1].iob, IobTag::Inside);
    assert_eq!(doc[1].offset, 4);
    for token in &doc.tokens()[..2] {
        assert_eq!(token.entity_type, "LOC");
        assert_eq!(token.head, 0);
        assert_eq!(token.relation, "_");
    }
    assert_eq!(doc[2].text, "is");
    assert_eq!(doc[2].relation, "root");
}

#[test]
fn test_merged_vertex_dependency_lands_on_first_member() {
    // A dependency edge outgoing from the merged surface vertex is
    // reported by the first token its lattice entity expands into;
    // the remaining members stay headless.
    let mut pool = StringPool::new();
    let mut builder = AnalysisResult::build(&mut pool, "eng");
    let merged = builder.push_word("New_York", "New_York");
    let is = builder.push_word("is", "be");
    let twin = builder.lattice_twin(merged).unwrap();
    let new = builder.add_lattice_word("New", "new", 0, None);
    let york = builder.add_lattice_word("York", "york", 4, None);
    builder.attach_entity(GraphLayer::Lattice, twin, "LOC", vec![new, york]);
    builder.add_dependency(merged, is, "nsubj");
    builder.add_dependency(is, is, "root");
    let result = builder.build();

    let properties = empty_properties();
    let projector = Projector::new(&pool, &properties);
    let doc = projector.project(&result);

    assert!(!doc.error());
    assert_eq!(doc[0].text, "New");
    assert_eq!(doc[0].relation, "nsubj");
    assert_eq!(doc[0].head, 2);
    assert_eq!(doc[1].text, "York");
    assert_eq!(doc[1].relation, "_");
    assert_eq!(doc[1].head, 0);
    assert_eq!(doc[2].relation, "root");
}

#[test]
fn test_adjacent_same_type_entities_continue_run() {
    let mut pool = StringPool::new();
    let mut builder = AnalysisResult::build(&mut pool, "eng");
    let anna = builder.push_word("Anna", "Anna");
    let maria = builder.push_word("Maria", "Maria");
    builder.attach_entity(GraphLayer::Surface, anna, "PER", vec![anna]);
    builder.attach_entity(GraphLayer::Surface, maria, "PER", vec![maria]);
    let result = builder.build();

    let properties = empty_properties();
    let projector = Projector::new(&pool, &properties);
    let doc = projector.project(&result);
    assert_eq!(doc[0].iob, IobTag::Begin);
    assert_eq!(doc[1].iob, IobTag::Inside);

    // With continuation disabled each annotation opens its own run.
    let config = ProjectionConfig::new().with_continue_adjacent_entities(false);
    let projector = Projector::new(&pool, &properties).with_config(config);
    let doc = projector.project(&result);
    assert_eq!(doc[0].iob, IobTag::Begin);
    assert_eq!(doc[1].iob, IobTag::Begin);
}

#[test]
fn test_entity_interrupted_by_plain_token_restarts() {
    let mut pool = StringPool::new();
    let mut builder = AnalysisResult::build(&mut pool, "eng");
    let anna = builder.push_word("Anna", "Anna");
    builder.push_word("and", "and");
    let maria = builder.push_word("Maria", "Maria");
    builder.attach_entity(GraphLayer::Surface, anna, "PER", vec![anna]);
    builder.attach_entity(GraphLayer::Surface, maria, "PER", vec![maria]);
    let result = builder.build();

    let properties = empty_properties();
    let projector = Projector::new(&pool, &properties);
    let doc = projector.project(&result);

    assert_eq!(doc[0].iob, IobTag::Begin);
    assert_eq!(doc[1].iob, IobTag::Outside);
    assert_eq!(doc[2].iob, IobTag::Begin);
}

#[test]
fn test_features_and_macro_category() {
    let mut pool = StringPool::new();
    let mut properties = PropertyResolver::new();
    properties
        .add_category("MACRO", CategoryKind::Macro, &[(1, "NOUN"), (2, "VERB")])
        .add_category("MICRO", CategoryKind::Micro, &[(10, "NC")])
        .add_category("GENDER", CategoryKind::Feature, &[(1, "masc"), (2, "fem")])
        .add_category("NUMBER", CategoryKind::Feature, &[(1, "sing"), (2, "plur")]);

    let mut builder = AnalysisResult::build(&mut pool, "fre");
    let features = FeatureSet::new()
        .with("MACRO", 1)
        .with("MICRO", 10)
        .with("NUMBER", 2)
        .with("GENDER", 2);
    builder.push_word_with("chattes", "chatte", Some(features), "t_alphanumeric");
    let result = builder.build();

    let projector = Projector::new(&pool, &properties);
    let doc = projector.project(&result);

    assert_eq!(doc.len(), 1);
    assert_eq!(doc[0].category, 1);
    // Macro and micro categories stay out of the feature string.
    assert_eq!(doc[0].features, "GENDER=fem|NUMBER=plur");
    assert_eq!(doc[0].status, "t_alphanumeric");
}

#[test]
fn test_control_characters_are_escaped() {
    let mut pool = StringPool::new();
    let mut builder = AnalysisResult::build(&mut pool, "eng");
    builder.push_word("a\tb", "a\tb");
    let result = builder.build();

    let properties = empty_properties();
    let projector = Projector::new(&pool, &properties);
    let doc = projector.project(&result);

    assert_eq!(doc[0].text, "a\\x09b");
}

#[test]
fn test_sentence_assembly() {
    let mut pool = StringPool::new();
    let mut builder = AnalysisResult::build(&mut pool, "eng");
    let a = builder.push_word("Paris", "Paris");
    let b = builder.push_word("sleeps", "sleep");
    let c = builder.push_word("Dogs", "dog");
    let d = builder.push_word("bark", "bark");
    builder.mark_sentence(a, b);
    builder.mark_sentence(c, d);
    let result = builder.build();

    let properties = empty_properties();
    let projector = Projector::new(&pool, &properties);
    let doc = projector.project(&result);

    assert_eq!(doc.sentences().len(), 2);
    assert_eq!((doc.sentences()[0].start, doc.sentences()[0].end), (0, 1));
    assert_eq!((doc.sentences()[1].start, doc.sentences()[1].end), (2, 3));
}

#[test]
fn test_sentence_spanning_entity_endpoints() {
    // Sentence endpoints referencing a vertex absorbed into a lattice
    // entity resolve through the covering vertex's alias.
    let mut pool = StringPool::new();
    let mut builder = AnalysisResult::build(&mut pool, "eng");
    let merged = builder.push_word("New_York", "New_York");
    let is = builder.push_word("is", "be");
    let twin = builder.lattice_twin(merged).unwrap();
    let new = builder.add_lattice_word("New", "new", 0, None);
    let york = builder.add_lattice_word("York", "york", 4, None);
    builder.attach_entity(GraphLayer::Lattice, twin, "LOC", vec![new, york]);
    builder.mark_sentence(merged, is);
    let result = builder.build();

    let properties = empty_properties();
    let projector = Projector::new(&pool, &properties);
    let doc = projector.project(&result);

    assert_eq!(doc.len(), 3);
    assert_eq!(doc.sentences().len(), 1);
    assert_eq!((doc.sentences()[0].start, doc.sentences()[0].end), (0, 2));
}

#[test]
fn test_missing_surface_graph_is_an_error_document() {
    let mut pool = StringPool::new();
    let mut builder = AnalysisResult::build(&mut pool, "eng");
    builder.push_word("Paris", "Paris");
    builder.without_surface();
    let result = builder.build();

    let properties = empty_properties();
    let projector = Projector::new(&pool, &properties);
    let doc = projector.project(&result);

    assert!(doc.error());
    assert_eq!(doc.error_message(), "no SurfaceGraph in analysis result");
    assert_eq!(doc.len(), 0);
    assert_eq!(doc.language(), "eng");
}

#[test]
fn test_missing_lattice_and_annotations_name_the_stage() {
    let properties = empty_properties();

    let mut pool = StringPool::new();
    let mut builder = AnalysisResult::build(&mut pool, "eng");
    builder.push_word("Paris", "Paris");
    builder.without_lattice();
    let result = builder.build();
    let projector = Projector::new(&pool, &properties);
    let doc = projector.project(&result);
    assert!(doc.error());
    assert_eq!(doc.error_message(), "no LatticeGraph in analysis result");

    let mut pool = StringPool::new();
    let mut builder = AnalysisResult::build(&mut pool, "eng");
    builder.push_word("Paris", "Paris");
    builder.without_annotations();
    let result = builder.build();
    let projector = Projector::new(&pool, &properties);
    let doc = projector.project(&result);
    assert!(doc.error());
    assert_eq!(doc.error_message(), "no Annotations in analysis result");
}

#[test]
fn test_duplicate_correspondence_is_a_contract_violation() {
    let mut pool = StringPool::new();
    let mut builder = AnalysisResult::build(&mut pool, "eng");
    let v = builder.push_word("Paris", "Paris");
    let stray = builder.add_lattice_word("Paris", "Paris", 0, None);
    builder.link(v, stray);
    let result = builder.build();

    let properties = empty_properties();
    let projector = Projector::new(&pool, &properties);
    let doc = projector.project(&result);

    assert!(doc.error());
    assert!(doc
        .error_message()
        .starts_with("correspondence contract violated"));
    assert_eq!(doc.len(), 0);
}

#[test]
fn test_projection_is_idempotent() {
    let mut pool = StringPool::new();
    let mut builder = AnalysisResult::build(&mut pool, "eng");
    let paris = builder.push_word("Paris", "Paris");
    let is = builder.push_word("is", "be");
    builder.add_dependency(paris, is, "nsubj");
    builder.mark_sentence(paris, is);
    let result = builder.build();

    let properties = empty_properties();
    let projector = Projector::new(&pool, &properties);
    let first = projector.project(&result);
    let second = projector.project(&result);
    assert_eq!(first, second);
}

#[test]
fn test_entity_type_probe() {
    let mut pool = StringPool::new();
    let mut builder = AnalysisResult::build(&mut pool, "eng");
    let paris = builder.push_word("Paris", "Paris");
    let is = builder.push_word("is", "be");
    builder.attach_entity(GraphLayer::Surface, paris, "LOC", vec![paris]);
    let result = builder.build();

    let properties = empty_properties();
    let projector = Projector::new(&pool, &properties);
    assert_eq!(projector.entity_type_of(&result, paris).unwrap(), "LOC");
    assert_eq!(projector.entity_type_of(&result, is).unwrap(), "_");
}

#[test]
fn test_document_table_snapshot() {
    let mut pool = StringPool::new();
    let mut builder = AnalysisResult::build(&mut pool, "eng");
    let new = builder.push_word("New", "new");
    let york = builder.push_word("York", "york");
    builder.attach_entity(GraphLayer::Surface, new, "LOC", vec![new, york]);
    let result = builder.build();

    let properties = empty_properties();
    let projector = Projector::new(&pool, &properties);
    let doc = projector.project(&result);

    insta::assert_snapshot!(doc.display().to_string(), @r###"
    #  TEXT  LEMMA  CAT  HEAD  REL  IOB  TYPE  FEAT
    0  New   new    0    0     _    B    LOC   _
    1  York  york   0    0     _    I    LOC   _
    "###);
}
