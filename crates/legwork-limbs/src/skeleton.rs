//! Bone hierarchy
//!
//! A flat arena of bones with parent/child links. Limb chains are read out
//! of it by walking from each direct child of the limb base down to the
//! leaves, which get flagged as end bones on the way.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::RigError;
use crate::types::BoneId;

/// A single bone node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bone {
    pub id: BoneId,
    pub name: String,
    pub parent: Option<BoneId>,
    pub children: Vec<BoneId>,
    /// World-space position
    pub position: Vec2,
    /// Set while walking the hierarchy when the bone has no child bones
    pub is_end_bone: bool,
}

/// Bone hierarchy of one creature
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Skeleton {
    bones: Vec<Bone>,
}

impl Skeleton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a spider-like skeleton: a base bone with `leg_count` straight
    /// hip/knee/foot legs radiating out of it.
    ///
    /// Bones of a leg sit `leg_length / 2` apart, so the hip shares the base
    /// position. Legs start along +X for even counts and +Y for odd counts.
    pub fn radial(base_position: Vec2, leg_count: usize, leg_length: f32) -> (Self, BoneId) {
        let mut skeleton = Self::new();
        let base = skeleton.add_bone("Base", base_position, None);

        let mut direction = if leg_count % 2 == 0 { Vec2::X } else { Vec2::Y };
        let step_angle = if leg_count > 0 {
            std::f32::consts::TAU / leg_count as f32
        } else {
            0.0
        };
        let segment = leg_length / 2.0;

        for leg in 0..leg_count {
            let mut parent = base;
            for (j, name) in ["Hip", "Knee", "Foot"].iter().enumerate() {
                let position = base_position + direction * segment * j as f32;
                parent = skeleton.add_bone(format!("{} {}", name, leg + 1), position, Some(parent));
            }
            direction = Vec2::from_angle(step_angle).rotate(direction);
        }

        log::debug!(
            "Skeleton: generated {} legs of length {:.2} ({} bones)",
            leg_count,
            leg_length,
            skeleton.len()
        );

        (skeleton, base)
    }

    /// Add a bone, linking it under `parent` when given
    pub fn add_bone(
        &mut self,
        name: impl Into<String>,
        position: Vec2,
        parent: Option<BoneId>,
    ) -> BoneId {
        let id = BoneId(self.bones.len() as u32);
        self.bones.push(Bone {
            id,
            name: name.into(),
            parent,
            children: Vec::new(),
            position,
            is_end_bone: true,
        });

        if let Some(parent) = parent
            && let Some(parent_bone) = self.bones.get_mut(parent.index())
        {
            parent_bone.children.push(id);
            parent_bone.is_end_bone = false;
        }

        id
    }

    pub fn bone(&self, id: BoneId) -> Option<&Bone> {
        self.bones.get(id.index())
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    pub fn position(&self, id: BoneId) -> Option<Vec2> {
        self.bone(id).map(|b| b.position)
    }

    pub fn set_position(&mut self, id: BoneId, position: Vec2) -> Result<(), RigError> {
        let bone = self
            .bones
            .get_mut(id.index())
            .ok_or(RigError::UnknownBone(id))?;
        bone.position = position;
        Ok(())
    }

    /// Move a bone and everything below it by `delta`
    pub fn translate_subtree(&mut self, id: BoneId, delta: Vec2) -> Result<(), RigError> {
        if self.bone(id).is_none() {
            return Err(RigError::UnknownBone(id));
        }

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(bone) = self.bones.get_mut(current.index()) {
                bone.position += delta;
                stack.extend(bone.children.iter().copied());
            }
        }
        Ok(())
    }

    /// Direct child bones of `id`. Flags `id` as an end bone when it has none.
    pub fn direct_children(&mut self, id: BoneId) -> Result<Vec<BoneId>, RigError> {
        let bone = self
            .bones
            .get_mut(id.index())
            .ok_or(RigError::UnknownBone(id))?;
        bone.is_end_bone = bone.children.is_empty();
        Ok(bone.children.clone())
    }

    /// `start` followed by all of its descendants in depth-first order.
    /// Leaves are flagged as end bones.
    pub fn limb_chain(&mut self, start: BoneId) -> Result<Vec<BoneId>, RigError> {
        if self.bone(start).is_none() {
            return Err(RigError::UnknownBone(start));
        }

        let mut chain = vec![start];
        self.collect_descendants(start, &mut chain);
        Ok(chain)
    }

    fn collect_descendants(&mut self, parent: BoneId, list: &mut Vec<BoneId>) {
        let children = match self.bones.get_mut(parent.index()) {
            Some(bone) => {
                bone.is_end_bone = bone.children.is_empty();
                bone.children.clone()
            }
            None => return,
        };

        for child in children {
            list.push(child);
            self.collect_descendants(child, list);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radial_skeleton_layout() {
        let (skeleton, base) = Skeleton::radial(Vec2::new(10.0, 5.0), 4, 2.0);

        // Base + 4 legs * 3 bones
        assert_eq!(skeleton.len(), 13);
        assert_eq!(skeleton.bone(base).unwrap().children.len(), 4);

        // First leg points along +X for even leg counts
        let hip = skeleton.bone(base).unwrap().children[0];
        let chain: Vec<Vec2> = {
            let mut s = skeleton.clone();
            s.limb_chain(hip)
                .unwrap()
                .into_iter()
                .map(|id| s.position(id).unwrap())
                .collect()
        };
        assert_eq!(chain[0], Vec2::new(10.0, 5.0));
        assert!((chain[1] - Vec2::new(11.0, 5.0)).length() < 1e-5);
        assert!((chain[2] - Vec2::new(12.0, 5.0)).length() < 1e-5);
    }

    #[test]
    fn test_radial_odd_count_starts_up() {
        let (skeleton, base) = Skeleton::radial(Vec2::ZERO, 3, 2.0);
        let hip = skeleton.bone(base).unwrap().children[0];
        let knee = skeleton.bone(hip).unwrap().children[0];
        assert!((skeleton.position(knee).unwrap() - Vec2::Y).length() < 1e-5);
    }

    #[test]
    fn test_limb_chain_marks_end_bone() {
        let mut skeleton = Skeleton::new();
        let base = skeleton.add_bone("Base", Vec2::ZERO, None);
        let hip = skeleton.add_bone("Hip", Vec2::ZERO, Some(base));
        let knee = skeleton.add_bone("Knee", Vec2::X, Some(hip));
        let foot = skeleton.add_bone("Foot", Vec2::X * 2.0, Some(knee));

        let chain = skeleton.limb_chain(hip).unwrap();
        assert_eq!(chain, vec![hip, knee, foot]);
        assert!(skeleton.bone(foot).unwrap().is_end_bone);
        assert!(!skeleton.bone(knee).unwrap().is_end_bone);
    }

    #[test]
    fn test_direct_children_of_leaf() {
        let mut skeleton = Skeleton::new();
        let base = skeleton.add_bone("Base", Vec2::ZERO, None);
        assert!(skeleton.direct_children(base).unwrap().is_empty());
        assert!(skeleton.bone(base).unwrap().is_end_bone);
    }

    #[test]
    fn test_translate_subtree_moves_descendants_only() {
        let mut skeleton = Skeleton::new();
        let root = skeleton.add_bone("Root", Vec2::ZERO, None);
        let a = skeleton.add_bone("A", Vec2::X, Some(root));
        let other = skeleton.add_bone("Other", Vec2::Y, None);

        skeleton.translate_subtree(root, Vec2::new(0.0, 3.0)).unwrap();
        assert_eq!(skeleton.position(a), Some(Vec2::new(1.0, 3.0)));
        assert_eq!(skeleton.position(other), Some(Vec2::Y));
    }

    #[test]
    fn test_unknown_bone() {
        let mut skeleton = Skeleton::new();
        let missing = BoneId::from_raw(7);
        assert_eq!(
            skeleton.set_position(missing, Vec2::ZERO),
            Err(RigError::UnknownBone(missing))
        );
    }
}
