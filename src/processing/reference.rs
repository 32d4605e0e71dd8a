//! Reference tables that drive the extraction heuristics.
//!
//! The defaults are compiled in, but every table can be replaced from a TOML
//! file so the vocabulary can grow without touching extraction logic.

use crate::error::{Result, ResumeExtractorError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceData {
    /// Known skill terms, lower-case, in reporting order
    pub skills: Vec<String>,
    /// Skill terms always reported in upper case
    pub uppercase_skills: Vec<String>,
    /// Degree and credential regex fragments
    pub degree_patterns: Vec<String>,
    /// Degrees strong enough to keep a line that also mentions a job role
    pub strong_degree_pattern: String,
    /// Lines matching any of these look like work history, not education
    pub role_filter_patterns: Vec<String>,
    pub institution_pattern: String,
    pub date_line_pattern: String,
    pub job_titles: Vec<String>,
    pub name_skip_patterns: Vec<String>,
    /// Keywords that disqualify a line in the relaxed name scan
    pub section_keywords: Vec<String>,
    /// Phrases stating aggregate experience; group 1 captures the year count
    pub experience_phrases: Vec<String>,
    pub present_words: Vec<String>,
    pub category_keywords: BTreeMap<String, Vec<String>>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for ReferenceData {
    fn default() -> Self {
        Self {
            skills: owned(&[
                // Programming languages
                "python", "java", "javascript", "typescript", "c++", "c#", "ruby", "go", "golang",
                "rust", "php", "swift", "kotlin", "scala", "r", "matlab", "perl", "bash", "shell",
                // Web
                "html", "css", "sass", "less", "react", "reactjs", "react.js", "angular", "angularjs",
                "vue", "vuejs", "vue.js", "next.js", "nextjs", "nuxt", "svelte", "jquery", "bootstrap",
                "tailwind", "tailwindcss", "material-ui", "webpack", "vite", "node.js", "nodejs",
                "express", "expressjs", "fastapi", "flask", "django", "spring", "spring boot",
                "asp.net", ".net", "graphql", "rest", "restful", "api",
                // Databases
                "sql", "mysql", "postgresql", "postgres", "mongodb", "redis", "elasticsearch",
                "cassandra", "dynamodb", "sqlite", "oracle", "sql server", "mariadb", "firebase",
                // Cloud and DevOps
                "aws", "amazon web services", "azure", "gcp", "google cloud", "docker", "kubernetes",
                "k8s", "jenkins", "ci/cd", "terraform", "ansible", "puppet", "chef", "nginx",
                "apache", "linux", "unix", "git", "github", "gitlab", "bitbucket", "jira",
                // AI/ML
                "machine learning", "deep learning", "tensorflow", "pytorch", "keras", "scikit-learn",
                "sklearn", "pandas", "numpy", "scipy", "matplotlib", "seaborn", "opencv", "nlp",
                "natural language processing", "computer vision", "neural networks", "cnn", "rnn",
                "lstm", "transformer", "bert", "gpt", "hugging face", "langchain", "llm",
                // Data
                "data analysis", "data science", "data engineering", "etl", "data visualization",
                "tableau", "power bi", "looker", "airflow", "spark", "hadoop", "hive", "kafka",
                "big data", "data mining", "statistics", "a/b testing",
                // Practices and tooling
                "agile", "scrum", "kanban", "microservices", "oop", "design patterns", "tdd",
                "unit testing", "integration testing", "selenium", "cypress", "jest", "pytest",
                "security", "oauth", "jwt", "ssl", "https",
            ]),
            uppercase_skills: owned(&[
                "aws", "gcp", "sql", "html", "css", "php", "api", "llm", "nlp", "cnn", "rnn",
                "lstm", "jwt", "ssl", "https", "tdd", "oop", "k8s",
            ]),
            degree_patterns: owned(&[
                r"\bbachelor'?s?\b", r"\bmaster'?s?\b", r"\bph\.?d\.?\b", r"\bdoctorate\b", r"\bdiploma\b",
                r"\bb\.?s\.?c?\.?\b", r"\bm\.?s\.?c?\.?\b", r"\bb\.?a\.?\b", r"\bm\.?a\.?\b", r"\bb\.?e\.?\b",
                r"\bm\.?e\.?\b", r"\bb\.?tech\b", r"\bm\.?tech\b", r"\bmba\b", r"\bbba\b",
                r"\bassociate'?s?\s+degree\b", r"\bcertificate\b", r"\bcertification\b",
                r"\bssc\b", r"\bhsc\b", r"\ba\s*-?levels?\b", r"\bo\s*-?levels?\b",
            ]),
            strong_degree_pattern: r"\b(bachelor|master|ph\.?d|doctorate|b\.?sc|m\.?sc|mba|ssc|hsc|levels?)\b"
                .to_string(),
            role_filter_patterns: owned(&[
                r"\b(manager|professor|assistant|lead|senior|junior|intern|member|coordinator|volunteer|developer|engineer)\b",
                r"\b(project|research|work|experience)\b",
            ]),
            institution_pattern:
                r"(?:university|college|institute|school)\s+(?:of\s+)?[A-Za-z\s]+|[A-Za-z\s]+\s+(?:university|college|institute|school)"
                    .to_string(),
            date_line_pattern:
                r"\b((?:19|20)\d{2}|present|current|now|ongoing|jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)\b"
                    .to_string(),
            job_titles: owned(&[
                "developer", "engineer", "scientist", "analyst", "manager", "lead", "architect",
                "consultant", "administrator", "designer", "intern", "assistant", "executive",
                "officer", "representative", "specialist", "coordinator", "director", "head",
                "vp", "president", "founder", "co-founder", "support", "service", "agent",
            ]),
            name_skip_patterns: owned(&[
                r"^(resume|cv|curriculum\s*vitae|profile|about|summary|objective|contact|experience|education|skills|projects|work|professional)s?$",
                r"^(email|phone|address|linkedin|github|portfolio|website)s?:?$",
                r"^(mr|ms|mrs|dr|prof)\.?\s*$",
                r"^\d+",
                r"^[+(\d]",
                r"@",
                r"^http",
                r"^www\.",
            ]),
            section_keywords: owned(&[
                "experience", "education", "skill", "project", "work", "summary", "objective", "contact",
            ]),
            experience_phrases: owned(&[
                r"(\d+)\+?\s*(?:years?|yrs?)\s*(?:of\s*)?(?:experience|exp)",
                r"(?:experience|exp)[:\s]*(\d+)\+?\s*(?:years?|yrs?)",
                r"(\d+)\+?\s*(?:years?|yrs?)\s*(?:in|of|as)",
            ]),
            present_words: owned(&["present", "current", "now", "ongoing", "till date", "to date"]),
            category_keywords: default_category_keywords(),
        }
    }
}

fn default_category_keywords() -> BTreeMap<String, Vec<String>> {
    let table: [(&str, &[&str]); 11] = [
        ("Web Developer", &[
            "web", "frontend", "front-end", "front end", "backend", "back-end", "back end",
            "fullstack", "full-stack", "full stack", "react", "node", "js", "html", "css",
            "django", "laravel", "developer", "engineer", "software", "freelance",
        ]),
        ("Full Stack Developer", &[
            "fullstack", "full-stack", "full stack", "web", "frontend", "backend", "react",
            "node", "django", "software", "developer", "engineer",
        ]),
        ("Software Engineer", &[
            "software", "engineer", "developer", "programmer", "system", "application", "tech", "stack",
        ]),
        ("AI Engineer", &[
            "ai", "machine learning", "ml", "deep learning", "dl", "nlp", "computer vision",
            "data scientist", "model", "algorithm",
        ]),
        ("Data Scientist", &[
            "data", "scientist", "analyst", "ml", "ai", "python", "statistics", "research",
        ]),
        ("Machine Learning Engineer", &[
            "machine learning", "ml", "ai", "model", "algorithm", "engineer",
        ]),
        ("DevOps Engineer", &[
            "devops", "cloud", "aws", "azure", "docker", "kubernetes", "ci/cd", "infrastructure", "systems",
        ]),
        ("Cloud Architect", &["cloud", "architect", "aws", "azure", "gcp", "infrastructure"]),
        ("Mobile App Developer", &[
            "mobile", "android", "ios", "flutter", "react native", "swift", "kotlin", "app",
        ]),
        ("QA Engineer", &["qa", "quality", "test", "automation", "selenium", "assurance"]),
        ("Cybersecurity Analyst", &["security", "cyber", "analyst", "network", "protection", "info"]),
    ];

    table
        .iter()
        .map(|(category, keywords)| (category.to_string(), owned(keywords)))
        .collect()
}

impl ReferenceData {
    /// Load tables from a TOML file; missing tables keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let data: ReferenceData = toml::from_str(&content).map_err(|e| {
            ResumeExtractorError::Configuration(format!(
                "Failed to parse reference data '{}': {}",
                path.display(),
                e
            ))
        })?;
        data.validate()?;
        Ok(data)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            ResumeExtractorError::Configuration(format!("Failed to serialize reference data: {}", e))
        })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Structural checks; pattern syntax is checked when the tables are compiled
    pub fn validate(&self) -> Result<()> {
        if self.skills.iter().any(|s| s.trim().is_empty()) {
            return Err(ResumeExtractorError::Configuration(
                "Skill table contains an empty entry".to_string(),
            ));
        }
        if self.job_titles.is_empty() {
            return Err(ResumeExtractorError::Configuration(
                "Job title table must not be empty".to_string(),
            ));
        }
        if self.degree_patterns.is_empty() {
            return Err(ResumeExtractorError::Configuration(
                "Degree pattern table must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Relevance keywords for a category; unknown labels fall back to their own words
    pub fn keywords_for_category(&self, category: &str) -> Vec<String> {
        match self.category_keywords.get(category) {
            Some(keywords) if !keywords.is_empty() => {
                keywords.iter().map(|k| k.to_lowercase()).collect()
            }
            _ => category
                .to_lowercase()
                .split_whitespace()
                .map(str::to_string)
                .collect(),
        }
    }
}
