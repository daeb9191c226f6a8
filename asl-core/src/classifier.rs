use asl_shared::{Finger, Gesture, HandPose};

use crate::config::ClassifierConfig;

type Predicate = fn(&HandPose, &ClassifierConfig) -> bool;

/// Most visually specific pose first.
pub const PRIORITY: [(Gesture, Predicate); 9] = [
    (Gesture::ILoveYou, is_i_love_you),
    (Gesture::Okay, is_okay),
    (Gesture::Hello, is_hello),
    (Gesture::No, is_no),
    (Gesture::IMe, is_i_me),
    (Gesture::Good, is_good),
    (Gesture::Bad, is_bad),
    (Gesture::Yes, is_yes),
    (Gesture::ThankYou, is_thank_you),
];

/// Maps one pose to a static gesture, or `None` when no rule matches.
pub fn classify(pose: &HandPose, config: &ClassifierConfig) -> Option<Gesture> {
    PRIORITY
        .iter()
        .find(|(_, predicate)| predicate(pose, config))
        .map(|(gesture, _)| *gesture)
}

/// Fingertip above its PIP joint; for the thumb, tip pushed sideways away
/// from the IP joint.
pub fn is_extended(pose: &HandPose, finger: Finger, config: &ClassifierConfig) -> bool {
    match finger {
        Finger::Thumb => {
            libm::fabsf(pose.tip(finger).x - pose.distal(finger).x) > config.thumb_extension_x
        }
        _ => pose.tip(finger).y < pose.proximal(finger).y,
    }
}

/// Fingertip below its PIP joint.
pub fn is_folded(pose: &HandPose, finger: Finger) -> bool {
    pose.tip(finger).y > pose.proximal(finger).y
}

/// Fingertip below the knuckle joining it to the palm.
pub fn is_folded_below_base(pose: &HandPose, finger: Finger) -> bool {
    pose.tip(finger).y > pose.base(finger).y
}

fn all_folded_below_base(pose: &HandPose, fingers: &[Finger]) -> bool {
    fingers.iter().all(|&finger| is_folded_below_base(pose, finger))
}

fn is_hello(pose: &HandPose, config: &ClassifierConfig) -> bool {
    let palm_forward = pose.base(Finger::Middle).z < pose.wrist().z;
    Finger::LONG
        .iter()
        .all(|&finger| is_extended(pose, finger, config))
        && palm_forward
}

fn is_i_love_you(pose: &HandPose, config: &ClassifierConfig) -> bool {
    is_extended(pose, Finger::Thumb, config)
        && is_extended(pose, Finger::Index, config)
        && is_extended(pose, Finger::Pinky, config)
        && is_folded(pose, Finger::Middle)
        && is_folded(pose, Finger::Ring)
}

fn is_good(pose: &HandPose, config: &ClassifierConfig) -> bool {
    let tip = pose.tip(Finger::Thumb).y;
    let margin = config.thumb_vertical_margin;
    tip + margin < pose.distal(Finger::Thumb).y
        && tip + margin < pose.proximal(Finger::Thumb).y
        && all_folded_below_base(pose, &Finger::LONG)
}

fn is_bad(pose: &HandPose, config: &ClassifierConfig) -> bool {
    let tip = pose.tip(Finger::Thumb).y;
    let margin = config.thumb_vertical_margin;
    tip - margin > pose.distal(Finger::Thumb).y
        && tip - margin > pose.proximal(Finger::Thumb).y
        && all_folded_below_base(pose, &Finger::LONG)
}

fn is_yes(pose: &HandPose, config: &ClassifierConfig) -> bool {
    let thumb_tip = pose.tip(Finger::Thumb);
    let wrapped =
        thumb_tip.distance_to(&pose.base(Finger::Index)) < config.fist_thumb_wrap_distance;
    let tucked =
        thumb_tip.distance_to(&pose.proximal(Finger::Thumb)) < config.fist_thumb_tuck_distance;
    (wrapped || tucked) && all_folded_below_base(pose, &Finger::LONG)
}

fn is_i_me(pose: &HandPose, config: &ClassifierConfig) -> bool {
    let upright = libm::fabsf(pose.tip(Finger::Index).x - pose.proximal(Finger::Index).x)
        < config.pointing_vertical_tolerance;
    is_extended(pose, Finger::Index, config)
        && all_folded_below_base(pose, &[Finger::Middle, Finger::Ring, Finger::Pinky])
        && upright
}

fn is_no(pose: &HandPose, config: &ClassifierConfig) -> bool {
    let index_tip = pose.tip(Finger::Index);
    let tips_together =
        libm::fabsf(index_tip.x - pose.tip(Finger::Middle).x) < config.no_tip_spread;
    let tapping_thumb = index_tip.distance_to(&pose.tip(Finger::Thumb)) < config.no_thumb_contact;
    is_extended(pose, Finger::Index, config)
        && is_extended(pose, Finger::Middle, config)
        && all_folded_below_base(pose, &[Finger::Ring, Finger::Pinky])
        && (tips_together || tapping_thumb)
}

fn is_okay(pose: &HandPose, config: &ClassifierConfig) -> bool {
    let ring_closed = pose
        .tip(Finger::Thumb)
        .distance_to(&pose.tip(Finger::Index))
        < config.okay_ring_distance;
    ring_closed
        && is_extended(pose, Finger::Middle, config)
        && is_extended(pose, Finger::Ring, config)
        && is_extended(pose, Finger::Pinky, config)
}

/// Thank You starts from an open hand and is only recognized by its motion.
fn is_thank_you(_pose: &HandPose, _config: &ClassifierConfig) -> bool {
    false
}
