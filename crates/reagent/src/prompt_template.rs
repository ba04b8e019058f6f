use include_dir::{include_dir, Dir};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tera::{Context, Error as TeraError, Tera};

static PROMPTS: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/prompts");

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\{(\w+)\}").expect("placeholder pattern is valid");
}

/// A template filled by literal `{name}` substitution.
///
/// There are no loops or conditionals; a placeholder with no matching variable is
/// left in the output verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    pub template: String,
    pub input_variables: Vec<String>,
}

impl PromptTemplate {
    pub fn new<S: Into<String>>(template: S) -> Self {
        Self {
            template: template.into(),
            input_variables: Vec::new(),
        }
    }

    pub fn with_input_variables<I, S>(mut self, variables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.input_variables = variables.into_iter().map(Into::into).collect();
        self
    }

    pub fn format(&self, variables: &HashMap<String, String>) -> String {
        PLACEHOLDER
            .replace_all(&self.template, |caps: &Captures| match variables.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    /// Declared input variables that `variables` does not supply
    pub fn missing_variables(&self, variables: &HashMap<String, String>) -> Vec<String> {
        self.input_variables
            .iter()
            .filter(|name| !variables.contains_key(*name))
            .cloned()
            .collect()
    }
}

/// Rendered prompt text plus free-form metadata
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromptValue {
    pub text: String,
    pub metadata: HashMap<String, Value>,
}

impl PromptValue {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata<K: Into<String>>(mut self, key: K, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn from_template(template: &PromptTemplate, variables: &HashMap<String, String>) -> Self {
        Self::new(template.format(variables))
    }
}

fn prompts_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src/prompts")
}

/// Render a Tera template string against any serializable context
pub fn load_prompt<T: Serialize>(template: &str, context_data: &T) -> Result<String, TeraError> {
    let mut tera = Tera::default();
    tera.add_raw_template("prompt", template)?;
    tera.render("prompt", &Context::from_serialize(context_data)?)
}

pub fn load_prompt_file<T: Serialize>(
    template_file: impl Into<PathBuf>,
    context_data: &T,
) -> Result<String, TeraError> {
    let path = template_file.into();
    // bare names resolve against the bundled prompts
    let path = if path.exists() { path } else { prompts_dir().join(path) };
    let template = fs::read_to_string(&path)
        .map_err(|e| TeraError::chain(format!("Cannot read prompt {}", path.display()), e))?;
    load_prompt(&template, context_data)
}

/// Render one of the prompts compiled into the crate
pub fn render_embedded<T: Serialize>(name: &str, context_data: &T) -> Result<String, TeraError> {
    let template = PROMPTS
        .get_file(name)
        .and_then(|file| file.contents_utf8())
        .ok_or_else(|| TeraError::msg(format!("Prompt '{}' is not embedded", name)))?;
    load_prompt(template, context_data)
}
