/// The pipeline path a request is routed to.
///
/// Classification is an exact, case-sensitive match on the request's
/// `instruction` field. Anything unrecognized, including the empty string,
/// is [`Instruction::General`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    AnalyzeCode,
    Refactor,
    GenerateTests,
    GenerateCode,
    General,
}

impl Instruction {
    pub fn classify(instruction: &str) -> Self {
        match instruction {
            "analyze-code" => Instruction::AnalyzeCode,
            "refactor" => Instruction::Refactor,
            "generate-tests" => Instruction::GenerateTests,
            "generate-code" => Instruction::GenerateCode,
            _ => Instruction::General,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Instruction::AnalyzeCode => "analyze-code",
            Instruction::Refactor => "refactor",
            Instruction::GenerateTests => "generate-tests",
            Instruction::GenerateCode => "generate-code",
            Instruction::General => "general",
        }
    }

    /// Heading used when formatting response text for this path.
    pub fn heading(&self) -> &'static str {
        match self {
            Instruction::AnalyzeCode => "Code analysis",
            Instruction::Refactor => "Refactoring result",
            Instruction::GenerateTests => "Generated tests",
            Instruction::GenerateCode => "Generated code",
            Instruction::General => "Analysis",
        }
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
