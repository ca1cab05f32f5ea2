//! End-to-end definition pass: source text through the scanner and the
//! definition parser into a live object graph, then dispatch against it.

use pretty_assertions::assert_eq;
use quill_lexer::{SourceText, TokenStream};
use quill_runtime::testing::LiteralMaker;
use quill_runtime::{OutputSink, Universe, Value};

const BESTIARY: &str = "\
# A tiny bestiary.

type animal based on null
  legs : 4
  dwelling : \"a den\"
methods
  'speak' : >> An animal makes a sound.
end

animal fido
  collar : \"red\"
end

null limbo
end
";

fn build() -> Universe {
    let mut universe = Universe::new();
    universe.set_output(OutputSink::buffer());
    let mut tokens = TokenStream::new(SourceText::new("bestiary.qil", BESTIARY));
    tokens.set_diagnostics(OutputSink::buffer());
    let made = universe
        .make(&mut tokens, &mut LiteralMaker)
        .expect("no fatal error");
    assert!(made, "definition pass should consume the whole stream");
    universe
}

#[test]
fn one_prototype_and_two_instances_are_registered() {
    let universe = build();
    // null object + system object + animal + fido + limbo.
    assert_eq!(universe.object_count(), 5);

    let animal = universe.object_named("animal").expect("animal is bound");
    let fido = universe.object_named("fido").expect("fido is bound");
    let limbo = universe.object_named("limbo").expect("limbo is bound");

    assert!(universe.object(animal).unwrap().is_prototype());
    assert!(!universe.object(fido).unwrap().is_prototype());
    assert_ne!(animal, fido);
    assert_eq!(universe.parent_of(fido), Some(animal));
    assert_eq!(universe.parent_of(limbo), None);
}

#[test]
fn instances_inherit_attributes_and_keep_their_own() {
    let mut universe = build();
    let fido = universe.object_named("fido").unwrap();
    let legs = universe.definitions().identifiers.find("legs").unwrap();
    let dwelling = universe.definitions().identifiers.find("dwelling").unwrap();
    let collar = universe.definitions().identifiers.find("collar").unwrap();

    assert_eq!(
        universe.attribute_value(fido, legs).unwrap(),
        Value::Numeric(4)
    );
    assert_eq!(
        universe.attribute_value(fido, dwelling).unwrap(),
        Value::String("a den".to_owned())
    );
    assert_eq!(
        universe.attribute_value(fido, collar).unwrap(),
        Value::String("red".to_owned())
    );

    // The prototype does not see instance attributes.
    let animal = universe.object_named("animal").unwrap();
    assert_eq!(
        universe.attribute_value(animal, collar).unwrap(),
        Value::Undefined
    );
}

#[test]
fn methods_inherit_and_write_to_the_shared_sink() {
    let mut universe = build();
    let fido = universe.object_named("fido").unwrap();
    let speak = universe.definitions().vocabulary.find("speak").unwrap();

    let result = universe.send(fido, &Value::Message(speak)).unwrap();
    assert_eq!(result, Value::Undefined);
    assert_eq!(
        universe.output().captured(),
        "An animal makes a sound.\n"
    );

    // An unknown message resolves to the ABSENT constant...
    let fly = universe.definitions_mut().vocabulary.intern("fly");
    assert_eq!(
        universe.send(fido, &Value::Message(fly)).unwrap(),
        Value::absent()
    );
    // ...and a non-message value is a silent no-op.
    assert_eq!(
        universe.send(fido, &Value::Numeric(1)).unwrap(),
        Value::Undefined
    );
}

#[test]
fn destroying_the_prototype_severs_inheritance_dynamically() {
    let mut universe = build();
    let animal = universe.object_named("animal").unwrap();
    let fido = universe.object_named("fido").unwrap();
    let legs = universe.definitions().identifiers.find("legs").unwrap();
    let collar = universe.definitions().identifiers.find("collar").unwrap();

    universe.destroy_object(animal);

    assert_eq!(universe.parent_of(fido), None);
    assert_eq!(
        universe.attribute_value(fido, legs).unwrap(),
        Value::Undefined
    );
    // Local attributes survive.
    assert_eq!(
        universe.attribute_value(fido, collar).unwrap(),
        Value::String("red".to_owned())
    );
}
