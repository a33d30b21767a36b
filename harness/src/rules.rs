//! Domain rule files: the crafting catalogue and problem statement.
//!
//! A rule file is JSON with four sections: `Items` and `Tools` (variable
//! names to zero-initialize), `Recipes` (name → Produces/Requires/
//! Consumes/Time), and `Problem` (Initial/Goal/Time). Parsing is manual
//! `serde_json::Value` extraction; quantities must be non-negative
//! integers.

use std::collections::BTreeMap;
use std::path::Path;

use stratagem_kernel::canon::canonical_json_bytes;
use stratagem_kernel::hash::{canonical_hash, ContentHash, DOMAIN_RULESET};

/// Error loading or validating a rule file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleFileError {
    /// File could not be read.
    Io { path: String, detail: String },
    /// Not valid JSON.
    Json { detail: String },
    /// A required field is absent or has the wrong shape.
    MalformedField { field: String, detail: String },
    /// A quantity or time is negative or not an integer.
    InvalidQuantity { field: String, raw: String },
    /// `Problem.Initial` or `Problem.Goal` names a variable that is not
    /// declared in `Items` or `Tools`.
    UndeclaredName { section: String, name: String },
    /// A recipe produces nothing.
    EmptyProduces { recipe: String },
}

impl std::fmt::Display for RuleFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, detail } => write!(f, "cannot read rule file {path}: {detail}"),
            Self::Json { detail } => write!(f, "rule file is not valid JSON: {detail}"),
            Self::MalformedField { field, detail } => {
                write!(f, "malformed field {field}: {detail}")
            }
            Self::InvalidQuantity { field, raw } => {
                write!(f, "quantity in {field} must be a non-negative integer, got {raw}")
            }
            Self::UndeclaredName { section, name } => {
                write!(f, "{section} references undeclared name {name}")
            }
            Self::EmptyProduces { recipe } => {
                write!(f, "recipe {recipe} produces nothing")
            }
        }
    }
}

impl std::error::Error for RuleFileError {}

/// One recipe: what it yields, what it needs, what it eats, how long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeV1 {
    /// Items gained on application.
    pub produces: BTreeMap<String, i64>,
    /// Tools that must be held (not consumed).
    pub requires: BTreeMap<String, i64>,
    /// Items deducted on application.
    pub consumes: BTreeMap<String, i64>,
    /// Time-budget cost.
    pub time: i64,
}

/// The problem statement: starting inventory, goals, and time budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemV1 {
    /// Starting quantities (anything unlisted starts at 0).
    pub initial: BTreeMap<String, i64>,
    /// Required quantities per goal item.
    pub goal: BTreeMap<String, i64>,
    /// Starting time budget.
    pub time: i64,
}

/// A parsed, validated rule file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSetV1 {
    /// Consumable/producible item names.
    pub items: Vec<String>,
    /// Tool names (produced once, held, never consumed).
    pub tools: Vec<String>,
    /// Recipe name → recipe.
    pub recipes: BTreeMap<String, RecipeV1>,
    /// The problem statement.
    pub problem: ProblemV1,
}

impl RuleSetV1 {
    /// Parse and validate a rule file from its JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`RuleFileError`] on any missing/misshapen field, negative
    /// or non-integer quantity, undeclared name, or productless recipe.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, RuleFileError> {
        let root = value.as_object().ok_or_else(|| RuleFileError::MalformedField {
            field: "<root>".into(),
            detail: "expected a JSON object".into(),
        })?;

        let items = string_list(root.get("Items"), "Items")?;
        let tools = string_list(root.get("Tools"), "Tools")?;

        let recipes_obj = root
            .get("Recipes")
            .and_then(serde_json::Value::as_object)
            .ok_or_else(|| RuleFileError::MalformedField {
                field: "Recipes".into(),
                detail: "expected an object of recipes".into(),
            })?;
        let mut recipes = BTreeMap::new();
        for (name, recipe_value) in recipes_obj {
            recipes.insert(name.clone(), parse_recipe(name, recipe_value)?);
        }

        let problem_obj = root
            .get("Problem")
            .and_then(serde_json::Value::as_object)
            .ok_or_else(|| RuleFileError::MalformedField {
                field: "Problem".into(),
                detail: "expected an object".into(),
            })?;
        let problem = ProblemV1 {
            initial: quantity_map(problem_obj.get("Initial"), "Problem.Initial", true)?,
            goal: quantity_map(problem_obj.get("Goal"), "Problem.Goal", false)?,
            time: quantity(problem_obj.get("Time"), "Problem.Time")?,
        };

        let rules = Self {
            items,
            tools,
            recipes,
            problem,
        };
        rules.check_names()?;
        Ok(rules)
    }

    /// Read, parse, and validate a rule file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`RuleFileError::Io`] / [`RuleFileError::Json`] for read
    /// and parse failures, plus everything [`RuleSetV1::from_value`]
    /// reports.
    pub fn load(path: &Path) -> Result<Self, RuleFileError> {
        let text = std::fs::read_to_string(path).map_err(|e| RuleFileError::Io {
            path: path.display().to_string(),
            detail: e.to_string(),
        })?;
        let value: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| RuleFileError::Json {
                detail: e.to_string(),
            })?;
        Self::from_value(&value)
    }

    /// Whether `name` is declared as a tool.
    #[must_use]
    pub fn is_tool(&self, name: &str) -> bool {
        self.tools.iter().any(|t| t == name)
    }

    /// Canonical bytes of the validated rule set.
    ///
    /// Built from the parsed structure, so two files that differ only in
    /// whitespace or key order digest identically.
    ///
    /// # Panics
    ///
    /// Never panics: all serialized quantities are integers.
    #[must_use]
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let recipe_json = |r: &RecipeV1| {
            serde_json::json!({
                "Consumes": r.consumes,
                "Produces": r.produces,
                "Requires": r.requires,
                "Time": r.time,
            })
        };
        let recipes: serde_json::Map<String, serde_json::Value> = self
            .recipes
            .iter()
            .map(|(name, r)| (name.clone(), recipe_json(r)))
            .collect();
        let value = serde_json::json!({
            "Items": self.items,
            "Problem": {
                "Goal": self.problem.goal,
                "Initial": self.problem.initial,
                "Time": self.problem.time,
            },
            "Recipes": recipes,
            "Tools": self.tools,
        });
        canonical_json_bytes(&value).expect("rule set quantities are integers")
    }

    /// Domain-separated digest of the canonical bytes.
    #[must_use]
    pub fn digest(&self) -> ContentHash {
        canonical_hash(DOMAIN_RULESET, &self.canonical_bytes())
    }

    fn check_names(&self) -> Result<(), RuleFileError> {
        let declared: Vec<&str> = self
            .items
            .iter()
            .chain(self.tools.iter())
            .map(String::as_str)
            .collect();
        for name in self.problem.initial.keys() {
            if !declared.contains(&name.as_str()) {
                return Err(RuleFileError::UndeclaredName {
                    section: "Problem.Initial".into(),
                    name: name.clone(),
                });
            }
        }
        for name in self.problem.goal.keys() {
            if !declared.contains(&name.as_str()) {
                return Err(RuleFileError::UndeclaredName {
                    section: "Problem.Goal".into(),
                    name: name.clone(),
                });
            }
        }
        Ok(())
    }
}

fn parse_recipe(name: &str, value: &serde_json::Value) -> Result<RecipeV1, RuleFileError> {
    let obj = value.as_object().ok_or_else(|| RuleFileError::MalformedField {
        field: format!("Recipes.{name}"),
        detail: "expected an object".into(),
    })?;

    let produces = quantity_map(obj.get("Produces"), &format!("Recipes.{name}.Produces"), false)?;
    if produces.is_empty() {
        return Err(RuleFileError::EmptyProduces {
            recipe: name.to_string(),
        });
    }
    Ok(RecipeV1 {
        produces,
        requires: quantity_map(obj.get("Requires"), &format!("Recipes.{name}.Requires"), true)?,
        consumes: quantity_map(obj.get("Consumes"), &format!("Recipes.{name}.Consumes"), true)?,
        time: quantity(obj.get("Time"), &format!("Recipes.{name}.Time"))?,
    })
}

fn string_list(
    value: Option<&serde_json::Value>,
    field: &str,
) -> Result<Vec<String>, RuleFileError> {
    let items = value
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| RuleFileError::MalformedField {
            field: field.to_string(),
            detail: "expected an array of strings".into(),
        })?;
    items
        .iter()
        .map(|v| {
            v.as_str().map(str::to_string).ok_or_else(|| {
                RuleFileError::MalformedField {
                    field: field.to_string(),
                    detail: format!("expected a string, got {v}"),
                }
            })
        })
        .collect()
}

/// Parse a `{name: qty}` object. `optional` sections default to empty.
fn quantity_map(
    value: Option<&serde_json::Value>,
    field: &str,
    optional: bool,
) -> Result<BTreeMap<String, i64>, RuleFileError> {
    let Some(value) = value else {
        if optional {
            return Ok(BTreeMap::new());
        }
        return Err(RuleFileError::MalformedField {
            field: field.to_string(),
            detail: "missing required section".into(),
        });
    };
    let obj = value.as_object().ok_or_else(|| RuleFileError::MalformedField {
        field: field.to_string(),
        detail: "expected an object of quantities".into(),
    })?;
    let mut map = BTreeMap::new();
    for (name, qty_value) in obj {
        let qty = quantity(Some(qty_value), &format!("{field}.{name}"))?;
        map.insert(name.clone(), qty);
    }
    Ok(map)
}

fn quantity(value: Option<&serde_json::Value>, field: &str) -> Result<i64, RuleFileError> {
    let value = value.ok_or_else(|| RuleFileError::MalformedField {
        field: field.to_string(),
        detail: "missing quantity".into(),
    })?;
    match value.as_i64() {
        Some(qty) if qty >= 0 => Ok(qty),
        _ => Err(RuleFileError::InvalidQuantity {
            field: field.to_string(),
            raw: value.to_string(),
        }),
    }
}
