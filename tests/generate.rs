use chrono::{NaiveDate, NaiveDateTime};
use prost_types::{
    field_descriptor_proto::{Label, Type},
    DescriptorProto, FieldDescriptorProto, FileDescriptorProto,
};
use protoc_gen_php::{
    Generator, NamespacePath, NamespaceTable, Options, Output, Warning, VERSION,
};
use similar_asserts::assert_eq;

fn timestamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 6)
        .unwrap()
        .and_hms_opt(7, 8, 9)
        .unwrap()
}

fn app_model_generator() -> Generator {
    let mut table = NamespaceTable::new();
    table.insert("a.b", NamespacePath::parse("App\\Model"));

    let mut generator = Generator::new(table);
    generator.timestamp(timestamp());
    generator
}

fn foo_file() -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some("model/foo.proto".to_owned()),
        package: Some("a.b".to_owned()),
        message_type: vec![DescriptorProto {
            name: Some("Foo".to_owned()),
            field: vec![FieldDescriptorProto {
                name: Some("bar".to_owned()),
                number: Some(1),
                label: Some(Label::Optional as i32),
                r#type: Some(Type::String as i32),
                default_value: Some("x".to_owned()),
                ..Default::default()
            }],
            ..Default::default()
        }],
        ..Default::default()
    }
}

fn app_model_options() -> Options {
    Options {
        namespace: Some("App\\Model".to_owned()),
        ..Default::default()
    }
}

#[test]
fn single_file_message() {
    let output = app_model_generator()
        .generate_file(&foo_file(), &app_model_options())
        .unwrap();

    assert!(output.warnings.is_empty());
    assert_eq!(output.files.len(), 1);

    let file = &output.files[0];
    assert_eq!(file.name(), "foo.php");

    let content = file.content();
    assert!(content.starts_with(&format!(
        "<?php\n\
         // DO NOT EDIT! Generated by Protobuf for PHP protoc plugin {}\n\
         // Source: model/foo.proto\n\
         //   Date: 2024-05-06 07:08:09\n\
         \n\
         namespace App\\Model {{\n",
        VERSION
    )));
    assert!(content.contains("class Foo extends \\DrSlump\\Protobuf\\Message {"));
    assert!(content.contains("$descriptor = new \\DrSlump\\Protobuf\\Descriptor('\\App\\Model\\Foo');"));
    assert!(content.contains("$f->default   = \"x\";"));
    assert!(content.contains("public $bar = \"x\";"));
    for method in ["hasBar()", "clearBar()", "getBar()", "setBar($value)"] {
        assert!(
            content.contains(&format!("public function {}{{", method)),
            "missing {}",
            method
        );
    }
}

#[test]
fn extensions_registered_in_global_namespace() {
    let mut file = foo_file();
    file.extension.push(FieldDescriptorProto {
        name: Some("ext".to_owned()),
        number: Some(100),
        label: Some(Label::Optional as i32),
        r#type: Some(Type::Int32 as i32),
        extendee: Some(".a.b.Foo".to_owned()),
        ..Default::default()
    });
    let options = Options {
        multifile: true,
        ..app_model_options()
    };

    let output = app_model_generator()
        .generate_file(&file, &options)
        .unwrap();

    let names: Vec<&str> = output.files.iter().map(|file| file.name()).collect();
    assert_eq!(names, vec!["App/Model/Foo.php", "foo-extensions.php"]);

    let extensions = output.file("foo-extensions.php").unwrap().content();
    assert!(extensions.contains("namespace {\n"));
    assert!(extensions.contains("\\App\\Model\\Foo::extension(function(){"));
    assert!(extensions.contains("$f->number    = 100;"));
    assert!(extensions.contains("$f->name      = \"App.Model.ext\";"));
    assert!(extensions.contains("return $f;"));
}

#[test]
fn output_is_deterministic() {
    let generator = app_model_generator();
    let first = generator
        .generate_file(&foo_file(), &app_model_options())
        .unwrap();
    let second = generator
        .generate_file(&foo_file(), &app_model_options())
        .unwrap();

    assert_eq!(first, second);
}

#[test]
fn suffix_option() {
    let options = Options {
        suffix: Some(".inc.php".to_owned()),
        ..app_model_options()
    };

    let output = app_model_generator()
        .generate_file(&foo_file(), &options)
        .unwrap();
    assert_eq!(output.files[0].name(), "foo.inc.php");
}

#[test]
fn empty_file_still_generates_single_file() {
    let file = FileDescriptorProto {
        name: Some("empty.proto".to_owned()),
        package: Some("a.b".to_owned()),
        ..Default::default()
    };

    let output = app_model_generator()
        .generate_file(&file, &Options::default())
        .unwrap();
    assert_eq!(output.files.len(), 1);
    assert_eq!(output.files[0].name(), "empty.php");

    let multi = app_model_generator()
        .generate_file(
            &file,
            &Options {
                multifile: true,
                ..Default::default()
            },
        )
        .unwrap();
    assert!(multi.files.is_empty());
}

fn multi_package_files() -> Vec<(FileDescriptorProto, Options)> {
    let common = FileDescriptorProto {
        name: Some("common.proto".to_owned()),
        package: Some("acme.common".to_owned()),
        message_type: vec![DescriptorProto {
            name: Some("Money".to_owned()),
            ..Default::default()
        }],
        ..Default::default()
    };
    let shop = FileDescriptorProto {
        name: Some("shop.proto".to_owned()),
        package: Some("acme".to_owned()),
        dependency: vec!["common.proto".to_owned()],
        message_type: vec![DescriptorProto {
            name: Some("Order".to_owned()),
            field: vec![
                FieldDescriptorProto {
                    name: Some("total".to_owned()),
                    number: Some(1),
                    label: Some(Label::Optional as i32),
                    r#type: Some(Type::Message as i32),
                    type_name: Some(".acme.common.Money".to_owned()),
                    ..Default::default()
                },
                FieldDescriptorProto {
                    name: Some("created".to_owned()),
                    number: Some(2),
                    label: Some(Label::Optional as i32),
                    r#type: Some(Type::Message as i32),
                    type_name: Some(".google.protobuf.Timestamp".to_owned()),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }],
        ..Default::default()
    };

    vec![
        (
            common,
            Options {
                package: Some("Acme.Common".to_owned()),
                ..Default::default()
            },
        ),
        (
            shop,
            Options {
                namespace: Some("Acme\\Shop".to_owned()),
                ..Default::default()
            },
        ),
    ]
}

#[test]
fn references_resolve_across_files() {
    let Output { files, warnings } = protoc_gen_php::generate(&multi_package_files()).unwrap();

    let names: Vec<&str> = files.iter().map(|file| file.name()).collect();
    assert_eq!(names, vec!["common.php", "shop.php"]);

    let shop = files[1].content();
    assert!(shop.contains("namespace Acme\\Shop {"));
    // The longer package wins over `acme`.
    assert!(shop.contains("$f->reference = '\\Acme\\Common\\Money';"));
    assert!(shop.contains("public function setTotal(\\Acme\\Common\\Money $value){"));
    assert!(shop.contains("$f->reference = '\\google\\protobuf\\Timestamp';"));

    assert_eq!(
        warnings,
        vec![Warning::UntrackedPackage {
            name: "google.protobuf.Timestamp".to_owned(),
        }]
    );
}

#[test]
fn file_order_does_not_change_resolution() {
    let mut files = multi_package_files();
    let forward = protoc_gen_php::generate(&files).unwrap();
    files.reverse();
    let backward = protoc_gen_php::generate(&files).unwrap();

    let strip_date = |output: &Output, name: &str| {
        output
            .file(name)
            .unwrap()
            .content()
            .lines()
            .filter(|line| !line.starts_with("//   Date:"))
            .collect::<Vec<_>>()
            .join("\n")
    };
    assert_eq!(strip_date(&forward, "shop.php"), strip_date(&backward, "shop.php"));
}

#[test]
fn unqualified_reference_fails_the_run() {
    let mut files = multi_package_files();
    files[1].0.message_type[0].field[0].type_name = Some("acme.common.Money".to_owned());

    let err = protoc_gen_php::generate(&files).unwrap_err();
    assert!(err.is_unqualified_reference());
    assert_eq!(
        err.to_string(),
        "only fully qualified names are supported: 'acme.common.Money'"
    );
}
