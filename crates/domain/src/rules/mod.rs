//! Rule components consulted by the Character aggregate and the creation
//! wizard: point-buy, progression formulas, and equip eligibility.

mod equipment;
mod point_buy;
mod progression;

pub use equipment::{can_equip, EquipRejection};
pub use point_buy::{
    cumulative_cost, point_cost, AttributeBudget, POINT_BUY_BUDGET, POINT_BUY_CEILING,
    POINT_BUY_FLOOR,
};
pub use progression::{
    armor_class, attack_bonus, attribute_modifier, class_bonus, class_bonus_by_id,
    exp_for_level, initiative, level_for_experience, max_health, proficiency_bonus,
    skill_modifier, skill_modifier_by_id, MAX_LEVEL, STARTING_LEVEL,
};
