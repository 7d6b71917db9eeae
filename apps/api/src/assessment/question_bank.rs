//! Static question bank. Curated sets for common skills, generic templates for the rest.
//!
//! Generic templates carry a `{skill}` placeholder that is substituted at generation time.

use crate::assessment::models::Question;

pub struct QuestionTemplate {
    pub id: &'static str,
    pub prompt: &'static str,
    pub options: &'static [&'static str],
    pub correct_answer: &'static str,
    pub explanation: &'static str,
}

impl QuestionTemplate {
    /// Instantiates the template for `skill`, substituting `{skill}` everywhere.
    pub fn render(&self, skill: &str) -> Question {
        let fill = |s: &str| s.replace("{skill}", skill);
        Question {
            id: self.id.to_string(),
            skill: skill.to_string(),
            prompt: fill(self.prompt),
            options: self.options.iter().map(|o| fill(o)).collect(),
            correct_answer: fill(self.correct_answer),
            explanation: fill(self.explanation),
        }
    }
}

const JAVASCRIPT: &[QuestionTemplate] = &[
    QuestionTemplate {
        id: "js1",
        prompt: "What is the difference between let, const, and var in JavaScript?",
        options: &[
            "Scope and hoisting behavior",
            "Only syntax differences",
            "No differences",
            "Only performance differences",
        ],
        correct_answer: "Scope and hoisting behavior",
        explanation: "let and const have block scope, while var has function scope. const cannot be reassigned.",
    },
    QuestionTemplate {
        id: "js2",
        prompt: "What does the spread operator (...) do in JavaScript?",
        options: &[
            "Expands arrays and objects",
            "Creates loops",
            "Defines functions",
            "Handles errors",
        ],
        correct_answer: "Expands arrays and objects",
        explanation: "The spread operator expands iterables like arrays and objects into individual elements.",
    },
];

const REACT: &[QuestionTemplate] = &[
    QuestionTemplate {
        id: "react1",
        prompt: "What is the purpose of useState hook in React?",
        options: &[
            "Manage component state",
            "Handle side effects",
            "Create components",
            "Style components",
        ],
        correct_answer: "Manage component state",
        explanation: "useState hook allows functional components to have state variables.",
    },
    QuestionTemplate {
        id: "react2",
        prompt: "What is JSX in React?",
        options: &[
            "JavaScript XML syntax extension",
            "A CSS framework",
            "A testing library",
            "A routing library",
        ],
        correct_answer: "JavaScript XML syntax extension",
        explanation: "JSX allows you to write HTML-like syntax in JavaScript for React components.",
    },
];

const NODE_JS: &[QuestionTemplate] = &[
    QuestionTemplate {
        id: "node1",
        prompt: "What is Node.js primarily used for?",
        options: &[
            "Server-side JavaScript runtime",
            "Frontend framework",
            "Database management",
            "CSS preprocessing",
        ],
        correct_answer: "Server-side JavaScript runtime",
        explanation: "Node.js allows JavaScript to run on the server side using the V8 engine.",
    },
    QuestionTemplate {
        id: "node2",
        prompt: "What is npm in Node.js?",
        options: &[
            "Node Package Manager",
            "Node Programming Model",
            "Node Process Manager",
            "Node Performance Monitor",
        ],
        correct_answer: "Node Package Manager",
        explanation: "npm is the default package manager for Node.js to install and manage dependencies.",
    },
];

const PYTHON: &[QuestionTemplate] = &[QuestionTemplate {
    id: "py1",
    prompt: "Which of the following is used to create a list in Python?",
    options: &["[]", "()", "{}", "<>"],
    correct_answer: "[]",
    explanation: "Square brackets [] are used to create lists in Python.",
}];

const JAVA: &[QuestionTemplate] = &[QuestionTemplate {
    id: "java1",
    prompt: "What is the main method signature in Java?",
    options: &[
        "public static void main(String[] args)",
        "public void main(String[] args)",
        "static void main(String[] args)",
        "public static main(String[] args)",
    ],
    correct_answer: "public static void main(String[] args)",
    explanation: "The main method must be public, static, and return void.",
}];

const SQL: &[QuestionTemplate] = &[QuestionTemplate {
    id: "sql1",
    prompt: "Which SQL command is used to retrieve data from a database?",
    options: &["SELECT", "INSERT", "UPDATE", "DELETE"],
    correct_answer: "SELECT",
    explanation: "SELECT is used to retrieve data from database tables.",
}];

/// Curated sets keyed by canonical skill name (exact match).
pub const CURATED: &[(&str, &[QuestionTemplate])] = &[
    ("JavaScript", JAVASCRIPT),
    ("React", REACT),
    ("Node.js", NODE_JS),
    ("Python", PYTHON),
    ("Java", JAVA),
    ("SQL", SQL),
];

/// Used for any skill without a curated set.
pub const GENERIC: &[QuestionTemplate] = &[
    QuestionTemplate {
        id: "default1",
        prompt: "What is a key concept in {skill}?",
        options: &[
            "Best practices",
            "Syntax only",
            "Installation only",
            "Documentation only",
        ],
        correct_answer: "Best practices",
        explanation: "Understanding best practices is crucial for mastering {skill}.",
    },
    QuestionTemplate {
        id: "default2",
        prompt: "How do you improve your {skill} skills?",
        options: &[
            "Practice and study",
            "Just read documentation",
            "Only watch videos",
            "Memorize syntax",
        ],
        correct_answer: "Practice and study",
        explanation: "Regular practice and continuous learning are key to improving {skill} skills.",
    },
];

pub fn curated_templates(skill: &str) -> Option<&'static [QuestionTemplate]> {
    CURATED
        .iter()
        .find(|(name, _)| *name == skill)
        .map(|(_, templates)| *templates)
}
