//! Canned response variants and keyword classification

use std::time::Duration;

/// Response variant selected by scanning the input for keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// Markdown formatting showcase (also the default)
    Markdown,
    /// Tool/function-calling demo with a structured invocation
    Tool,
    /// Fixed error-demonstration text, delivered as a normal response
    Error,
    /// Long-form content for scroll and performance testing
    Long,
}

impl ResponseKind {
    /// Classify an input by case-insensitive substring match against ordered
    /// keyword groups. The first matching group wins; no combination logic.
    pub fn classify(input: &str) -> Self {
        let lower = input.to_lowercase();

        if lower.contains("markdown") || lower.contains("format") {
            return ResponseKind::Markdown;
        }
        if lower.contains("tool") || lower.contains("function") || lower.contains("code") {
            return ResponseKind::Tool;
        }
        if lower.contains("error") || lower.contains("fail") {
            return ResponseKind::Error;
        }
        if lower.contains("long") || lower.contains("detailed") || lower.contains("extensive") {
            return ResponseKind::Long;
        }

        ResponseKind::Markdown
    }

    /// Fixed pre-response delay used by atomic delivery
    pub fn response_delay(&self) -> Duration {
        match self {
            ResponseKind::Long => Duration::from_millis(3000),
            ResponseKind::Tool => Duration::from_millis(2000),
            _ => Duration::from_millis(1500),
        }
    }

    /// Narrative text delivered for this variant
    pub fn text(&self) -> &'static str {
        match self {
            ResponseKind::Markdown => MARKDOWN_DEMO,
            ResponseKind::Tool => TOOL_NARRATIVE,
            ResponseKind::Error => ERROR_DEMO,
            ResponseKind::Long => LONG_DEMO,
        }
    }
}

/// Name of the demo tool
pub const CODE_GENERATOR: &str = "code_generator";

/// Arguments payload of the demo tool call
pub fn code_generator_args() -> serde_json::Value {
    serde_json::json!({
        "language": "python",
        "description": "Generate a simple calculator function",
        "requirements": ["addition", "subtraction", "multiplication", "division"],
    })
}

/// Result payload of the demo tool call
pub fn code_generator_result() -> serde_json::Value {
    serde_json::json!({
        "code": CALCULATOR_CODE,
        "explanation": "Created a calculator function with error handling for division by zero and invalid operations.",
    })
}

const CALCULATOR_CODE: &str = r#"def calculator(a, b, operation):
    """
    Simple calculator function

    Args:
        a (float): First number
        b (float): Second number
        operation (str): Operation type (+, -, *, /)

    Returns:
        float: Result of the calculation
    """
    if operation == '+':
        return a + b
    elif operation == '-':
        return a - b
    elif operation == '*':
        return a * b
    elif operation == '/':
        if b != 0:
            return a / b
        else:
            raise ValueError("Cannot divide by zero")
    else:
        raise ValueError("Invalid operation")

# Example usage
result = calculator(10, 5, '+')
print(f"10 + 5 = {result}")"#;

pub(crate) const TOOL_NARRATIVE: &str =
    "I'll help you with that tool request. Let me process this step by step.";

pub(crate) const ERROR_DEMO: &str = "I encountered an error while processing your request. \
     This demonstrates how errors are handled in the chat system.";

pub(crate) const MARKDOWN_DEMO: &str = r##"# Markdown Demo Response

This is a **comprehensive markdown** response to demonstrate various formatting capabilities:

## Code Examples

Here's some `inline code` and a code block:

```typescript
interface User {
  id: number;
  name: string;
  email: string;
}

const createUser = (data: Partial<User>): User => {
  return {
    id: Date.now(),
    ...data,
  } as User;
};
```

## Lists and Tables

### Unordered List
- **Bold item**
- *Italic item*
- Regular item with [link](https://example.com)

### Ordered List
1. First step
2. Second step
3. Third step

### Table
| Feature | Status | Notes |
|---------|--------|-------|
| Markdown | ✅ Working | Full support |
| Code highlighting | ✅ Working | TypeScript ready |
| Tables | ✅ Working | Responsive |

## Blockquotes

> This is a blockquote example.
> It can span multiple lines and demonstrates
> how quoted text appears in the chat.

## Additional Elements

- Checkboxes: ✅ ❌ ⏳
- Emojis: 🚀 💻 🎉
- **Emphasis**: *italic*, **bold**, ***both***"##;

pub(crate) const LONG_DEMO: &str = r##"# Long Response Demonstration

This is a deliberately long response to test scrolling, message handling, and UI performance with extensive content.

## Introduction

When dealing with AI responses, it's important to handle various content lengths effectively. This response demonstrates how the chat system manages longer content while maintaining readability and performance.

## Detailed Technical Analysis

### Frontend Architecture

The chat system uses several key technologies:

1. **React with TypeScript** for type-safe component development
2. **State management** through custom hooks
3. **Markdown rendering** via react-markdown
4. **Responsive design** with Tailwind CSS

### Component Structure

```
Chat System/
├── Chat (Main container)
├── Message (Individual message display)
├── ChatInput (Input with auto-resize)
├── StreamMessage (Streaming content)
└── MessageList (Message collection)
```

### Key Features

#### Real-time Communication
- WebSocket or HTTP streaming support
- Graceful fallback mechanisms
- Connection state management
- Retry logic for failed requests

#### Message Processing
- Markdown parsing and rendering
- Code syntax highlighting
- Tool invocation display
- Error state handling

#### User Experience
- Auto-scrolling to new messages
- Input auto-resize based on content
- Keyboard shortcuts for common actions
- Accessibility features (ARIA labels, keyboard navigation)

## Performance Considerations

### Optimization Strategies

1. **Virtualization** for long message lists
2. **Lazy loading** for message history
3. **Debounced input** to reduce API calls
4. **Memoization** of expensive computations

### Memory Management

- Cleanup of event listeners
- Abort controllers for cancelled requests
- Efficient state updates
- Component unmounting handling

## Security Aspects

### Input Sanitization
- XSS prevention through proper escaping
- Content Security Policy headers
- Input validation and filtering
- Rate limiting on API endpoints

### Data Privacy
- Secure message transmission
- Local storage encryption
- Session management
- Audit logging capabilities

## Conclusion

This extensive response demonstrates the chat system's ability to handle various content types and lengths while maintaining performance and user experience. The implementation showcases modern React patterns, TypeScript best practices, and thoughtful UX design.

The system is designed to be extensible, allowing for easy integration of additional features such as file uploads, voice messages, or custom tool integrations."##;
