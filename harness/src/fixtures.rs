//! Canned rule sets used by tests and the scenario suite.
//!
//! Each fixture is a small, self-contained world exercising one search
//! behavior: trivial production, infeasibility, rival recipes, and a
//! self-consuming recipe loop. The crafting catalog is a larger world
//! for the domain heuristics.

use crate::rules::RuleSetV1;

fn rules(value: serde_json::Value) -> RuleSetV1 {
    RuleSetV1::from_value(&value).expect("fixture rule set is well-formed")
}

/// One item, one recipe, a goal two applications away.
#[must_use]
pub fn punch_wood_rules() -> RuleSetV1 {
    rules(serde_json::json!({
        "Items": ["wood"],
        "Tools": [],
        "Recipes": {
            "punch for wood": {
                "Produces": { "wood": 1 },
                "Time": 4
            }
        },
        "Problem": {
            "Initial": {},
            "Goal": { "wood": 2 },
            "Time": 100
        }
    }))
}

/// Unreachable goal: the press and the gear together need more iron
/// than exists, and no recipe yields iron.
#[must_use]
pub fn stymied_rules() -> RuleSetV1 {
    rules(serde_json::json!({
        "Items": ["iron", "gear"],
        "Tools": ["press"],
        "Recipes": {
            "cast gear": {
                "Produces": { "gear": 1 },
                "Requires": { "press": 1 },
                "Consumes": { "iron": 2 },
                "Time": 5
            },
            "build press": {
                "Produces": { "press": 1 },
                "Consumes": { "iron": 3 },
                "Time": 10
            }
        },
        "Problem": {
            "Initial": { "iron": 4 },
            "Goal": { "gear": 1 },
            "Time": 100
        }
    }))
}

/// Two recipes for the same product with different time costs.
#[must_use]
pub fn rival_recipes_rules() -> RuleSetV1 {
    rules(serde_json::json!({
        "Items": ["stone"],
        "Tools": [],
        "Recipes": {
            "quick quarry": {
                "Produces": { "stone": 1 },
                "Time": 2
            },
            "slow quarry": {
                "Produces": { "stone": 1 },
                "Time": 8
            }
        },
        "Problem": {
            "Initial": {},
            "Goal": { "stone": 1 },
            "Time": 100
        }
    }))
}

/// The only metal recipe consumes more metal than it yields, so the
/// search would regress forever without the repetition bound.
#[must_use]
pub fn ouroboros_rules() -> RuleSetV1 {
    rules(serde_json::json!({
        "Items": ["metal"],
        "Tools": [],
        "Recipes": {
            "refine metal": {
                "Produces": { "metal": 1 },
                "Consumes": { "metal": 2 },
                "Time": 1
            }
        },
        "Problem": {
            "Initial": {},
            "Goal": { "metal": 1 },
            "Time": 50
        }
    }))
}

/// A crafting catalog with tool tiers: axes speed up wood gathering,
/// pickaxes unlock cobble and iron. Exercises the domain heuristics and
/// derive-once tool production.
#[must_use]
pub fn crafting_catalog_rules() -> RuleSetV1 {
    rules(serde_json::json!({
        "Items": ["wood", "plank", "stick", "cobble", "iron"],
        "Tools": [
            "wooden_axe", "stone_axe", "iron_axe",
            "wooden_pickaxe", "stone_pickaxe", "iron_pickaxe"
        ],
        "Recipes": {
            "punch for wood": {
                "Produces": { "wood": 1 },
                "Time": 4
            },
            "wooden_axe for wood": {
                "Produces": { "wood": 1 },
                "Requires": { "wooden_axe": 1 },
                "Time": 2
            },
            "stone_axe for wood": {
                "Produces": { "wood": 1 },
                "Requires": { "stone_axe": 1 },
                "Time": 1
            },
            "iron_axe for wood": {
                "Produces": { "wood": 1 },
                "Requires": { "iron_axe": 1 },
                "Time": 1
            },
            "craft plank": {
                "Produces": { "plank": 4 },
                "Consumes": { "wood": 1 },
                "Time": 1
            },
            "craft stick": {
                "Produces": { "stick": 4 },
                "Consumes": { "plank": 2 },
                "Time": 1
            },
            "craft wooden_axe": {
                "Produces": { "wooden_axe": 1 },
                "Consumes": { "plank": 3, "stick": 2 },
                "Time": 1
            },
            "craft stone_axe": {
                "Produces": { "stone_axe": 1 },
                "Consumes": { "cobble": 3, "stick": 2 },
                "Time": 1
            },
            "craft iron_axe": {
                "Produces": { "iron_axe": 1 },
                "Consumes": { "iron": 3, "stick": 2 },
                "Time": 1
            },
            "craft wooden_pickaxe": {
                "Produces": { "wooden_pickaxe": 1 },
                "Consumes": { "plank": 3, "stick": 2 },
                "Time": 1
            },
            "craft stone_pickaxe": {
                "Produces": { "stone_pickaxe": 1 },
                "Consumes": { "cobble": 3, "stick": 2 },
                "Time": 1
            },
            "craft iron_pickaxe": {
                "Produces": { "iron_pickaxe": 1 },
                "Consumes": { "iron": 3, "stick": 2 },
                "Time": 1
            },
            "wooden_pickaxe for cobble": {
                "Produces": { "cobble": 1 },
                "Requires": { "wooden_pickaxe": 1 },
                "Time": 4
            },
            "stone_pickaxe for iron": {
                "Produces": { "iron": 1 },
                "Requires": { "stone_pickaxe": 1 },
                "Time": 2
            }
        },
        "Problem": {
            "Initial": {},
            "Goal": { "wood": 3 },
            "Time": 100
        }
    }))
}
