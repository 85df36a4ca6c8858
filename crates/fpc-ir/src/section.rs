//! Named literal host-code sections (`@header { ... }` and friends).

use serde::{Deserialize, Serialize};

/// The fixed vocabulary of section names.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum SectionKind {
    /// `@header` — spliced before the generated header includes.
    Header,
    /// `@class` — spliced into the public part of the generated class.
    Class,
    /// `@cpp` — spliced after the generated source includes.
    Cpp,
    /// `@constructorParams` — extra parameters appended to the factory
    /// and constructor.
    ConstructorParams,
    /// `@constructor` — replaces the generated constructor.
    Constructor,
    /// `@initializers` — extra entries in the constructor initializer list.
    Initializers,
    /// `@emitCode` — host code run before the lowered shader body.
    EmitCode,
    /// `@fields` — extra field declarations.
    Fields,
    /// `@clone` — replaces the generated clone body.
    Clone,
    /// `@make` — replaces the generated factory.
    Make,
    /// `@setData(pdman)` — custom uniform upload code.
    SetData,
    /// `@test(d)` — body of the test-factory method.
    Test,
}

impl SectionKind {
    /// Returns the `@name` as written in source.
    pub fn name(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Class => "class",
            Self::Cpp => "cpp",
            Self::ConstructorParams => "constructorParams",
            Self::Constructor => "constructor",
            Self::Initializers => "initializers",
            Self::EmitCode => "emitCode",
            Self::Fields => "fields",
            Self::Clone => "clone",
            Self::Make => "make",
            Self::SetData => "setData",
            Self::Test => "test",
        }
    }

    /// Returns `true` if this section declares a parameter identifier.
    pub fn takes_param(self) -> bool {
        matches!(self, Self::SetData | Self::Test)
    }
}

/// A named block of literal host-language text.
///
/// The text is preserved byte-for-byte; emission splices it verbatim.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Section {
    pub kind: SectionKind,
    /// The declared parameter identifier for `setData`/`test` sections.
    pub param: Option<String>,
    pub text: String,
    /// 1-based source line of the section header.
    pub line: u32,
}
