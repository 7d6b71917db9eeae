//! Canonical skill names recognised by the keyword extractor.
//!
//! Matching is plain substring containment, so entries that are common
//! English fragments ("R", "Go", "AI", ".NET", "iOS") are left out: they would
//! match almost any resume.

pub const SKILL_CATALOG: &[&str] = &[
    // Programming languages
    "JavaScript",
    "Python",
    "Java",
    "C++",
    "C#",
    "PHP",
    "Ruby",
    "Rust",
    "Swift",
    "Kotlin",
    "Scala",
    "MATLAB",
    "Objective-C",
    "TypeScript",
    // Frontend
    "React",
    "Angular",
    "Vue.js",
    "Next.js",
    "HTML",
    "CSS",
    "SASS",
    "Bootstrap",
    "Tailwind CSS",
    "jQuery",
    "Webpack",
    // Backend
    "Node.js",
    "Express",
    "Django",
    "Flask",
    "Spring Boot",
    "Laravel",
    "Ruby on Rails",
    "ASP.NET",
    "FastAPI",
    // Databases
    "SQL",
    "MySQL",
    "PostgreSQL",
    "MongoDB",
    "Redis",
    "Elasticsearch",
    "SQLite",
    "Oracle",
    "DynamoDB",
    // Cloud & DevOps
    "AWS",
    "Azure",
    "Google Cloud",
    "GCP",
    "Docker",
    "Kubernetes",
    "Jenkins",
    "CI/CD",
    "DevOps",
    "Terraform",
    // Mobile
    "React Native",
    "Flutter",
    "Android",
    // Data science & ML
    "Machine Learning",
    "Deep Learning",
    "Data Science",
    "TensorFlow",
    "PyTorch",
    "Pandas",
    "NumPy",
    "Scikit-learn",
    "Keras",
    // Tooling & practices
    "Git",
    "GitHub",
    "GraphQL",
    "REST API",
    "Microservices",
    "Linux",
    "Agile",
    // Testing
    "Jest",
    "Cypress",
    "Selenium",
    "JUnit",
    // Design & BI
    "Figma",
    "UI/UX",
    "Tableau",
    "Power BI",
];

#[cfg(test)]
/// Returns true when `skill` is a canonical catalog entry (exact, case-sensitive).
pub fn is_catalog_skill(skill: &str) -> bool {
    SKILL_CATALOG.contains(&skill)
}
