// Animation parameter table
//
// The animation controller is driven purely by named parameters; which clip
// plays and how clips blend is the renderer's business. Controllers write
// parameters here and nothing else.

use std::collections::HashMap;

/// Parameters understood by the character animation graphs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimParam {
    IsMoving,
    IsJumping,
    IsFalling,
    IsAttacking,
    IsHit,
    VerticalVelocity,
    ShootState,
}

impl AnimParam {
    /// Name of the parameter in the animation graph
    pub fn name(self) -> &'static str {
        match self {
            AnimParam::IsMoving => "IsMoving",
            AnimParam::IsJumping => "IsJumping",
            AnimParam::IsFalling => "IsFalling",
            AnimParam::IsAttacking => "IsAttacking",
            AnimParam::IsHit => "IsHit",
            AnimParam::VerticalVelocity => "VerticalVelocity",
            AnimParam::ShootState => "ShootState",
        }
    }
}

/// Value of an animation parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Bool(bool),
    Float(f32),
    Int(i32),
}

/// Parameter values for one animated entity
#[derive(Debug, Default, Clone)]
pub struct AnimationParameters {
    values: HashMap<AnimParam, ParamValue>,
}

impl AnimationParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, param: AnimParam, value: ParamValue) {
        self.values.insert(param, value);
    }

    pub fn get(&self, param: AnimParam) -> Option<ParamValue> {
        self.values.get(&param).copied()
    }

    pub fn set_bool(&mut self, param: AnimParam, value: bool) {
        self.set(param, ParamValue::Bool(value));
    }

    pub fn set_float(&mut self, param: AnimParam, value: f32) {
        self.set(param, ParamValue::Float(value));
    }

    pub fn set_int(&mut self, param: AnimParam, value: i32) {
        self.set(param, ParamValue::Int(value));
    }

    pub fn get_int(&self, param: AnimParam) -> Option<i32> {
        match self.get(param)? {
            ParamValue::Int(v) => Some(v),
            _ => None,
        }
    }

    /// Values keyed by graph name, for handing to a renderer
    pub fn named_values(&self) -> Vec<(&'static str, ParamValue)> {
        let mut values: Vec<_> = self.values.iter().map(|(p, v)| (p.name(), *v)).collect();
        values.sort_by_key(|(name, _)| *name);
        values
    }
}

#[cfg(test)]
impl AnimationParameters {
    /// Unset booleans read as false
    pub fn get_bool(&self, param: AnimParam) -> bool {
        matches!(self.get(param), Some(ParamValue::Bool(true)))
    }

    pub fn get_float(&self, param: AnimParam) -> Option<f32> {
        match self.get(param)? {
            ParamValue::Float(v) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_bool_is_false() {
        let params = AnimationParameters::new();
        assert!(!params.get_bool(AnimParam::IsMoving));
        assert_eq!(params.get(AnimParam::IsMoving), None);
    }

    #[test]
    fn test_typed_accessors() {
        let mut params = AnimationParameters::new();
        params.set_bool(AnimParam::IsJumping, true);
        params.set_float(AnimParam::VerticalVelocity, -2.5);
        params.set_int(AnimParam::ShootState, 3);

        assert!(params.get_bool(AnimParam::IsJumping));
        assert_eq!(params.get_float(AnimParam::VerticalVelocity), Some(-2.5));
        assert_eq!(params.get_int(AnimParam::ShootState), Some(3));
        // Wrong type reads as absent
        assert_eq!(params.get_float(AnimParam::ShootState), None);
    }

    #[test]
    fn test_overwrite() {
        let mut params = AnimationParameters::new();
        params.set_bool(AnimParam::IsHit, true);
        params.set_bool(AnimParam::IsHit, false);
        assert!(!params.get_bool(AnimParam::IsHit));
    }

    #[test]
    fn test_named_values_sorted() {
        let mut params = AnimationParameters::new();
        params.set_bool(AnimParam::IsMoving, true);
        params.set_int(AnimParam::ShootState, 1);
        params.set_bool(AnimParam::IsFalling, false);

        let names: Vec<_> = params.named_values().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["IsFalling", "IsMoving", "ShootState"]);
    }
}
