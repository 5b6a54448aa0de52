//! Demo scenario catalog surfaced by demo frontends

use serde::Serialize;

/// A canned scenario: which keyword triggers it and an example prompt.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DemoScenario {
    pub trigger: &'static str,
    pub description: &'static str,
    pub example: &'static str,
}

/// The scenarios the mock responder can demonstrate
pub const DEMO_SCENARIOS: &[DemoScenario] = &[
    DemoScenario {
        trigger: "markdown",
        description: "Demonstrates comprehensive Markdown formatting including code blocks, tables, lists, and links",
        example: "Show me markdown formatting examples",
    },
    DemoScenario {
        trigger: "tool",
        description: "Shows tool/function calling capabilities with input/output visualization",
        example: "Generate some code for me",
    },
    DemoScenario {
        trigger: "error",
        description: "Demonstrates error handling and display",
        example: "Trigger an error",
    },
    DemoScenario {
        trigger: "long",
        description: "Tests UI with extensive content to verify scrolling and performance",
        example: "Give me a detailed explanation",
    },
];
