use camgate_camera::{
    CameraDeviceInfo, CapabilityProbe, HardwareTier, LensFacing, StaticDeviceQuery,
};
use proptest::prelude::*;

fn non_legacy_tier() -> impl Strategy<Value = HardwareTier> {
    prop_oneof![
        Just(HardwareTier::Limited),
        Just(HardwareTier::Full),
        Just(HardwareTier::Level3),
        Just(HardwareTier::External),
    ]
}

fn any_tier() -> impl Strategy<Value = HardwareTier> {
    prop_oneof![Just(HardwareTier::Legacy), non_legacy_tier()]
}

fn facing() -> impl Strategy<Value = LensFacing> {
    prop_oneof![
        Just(LensFacing::Front),
        Just(LensFacing::Back),
        Just(LensFacing::External),
    ]
}

fn devices(tiers: Vec<(HardwareTier, LensFacing)>) -> StaticDeviceQuery {
    tiers
        .into_iter()
        .enumerate()
        .map(|(i, (tier, facing))| CameraDeviceInfo::new(i.to_string(), tier, facing))
        .collect()
}

proptest! {
    #[test]
    fn any_legacy_device_makes_the_set_inadequate(
        mut tiers in prop::collection::vec((any_tier(), facing()), 0..8),
        legacy_facing in facing(),
        position in any::<prop::sample::Index>(),
    ) {
        let at = position.index(tiers.len() + 1);
        tiers.insert(at, (HardwareTier::Legacy, legacy_facing));

        let verdict = CapabilityProbe::new(devices(tiers)).probe().unwrap();
        prop_assert!(!verdict.adequate);
        prop_assert!(verdict.legacy_devices.contains(&at.to_string()));
    }

    #[test]
    fn sets_without_legacy_devices_are_adequate(
        tiers in prop::collection::vec((non_legacy_tier(), facing()), 0..8),
    ) {
        let count = tiers.len();
        let verdict = CapabilityProbe::new(devices(tiers)).probe().unwrap();
        prop_assert!(verdict.adequate);
        prop_assert_eq!(verdict.inspected, count);
        prop_assert!(verdict.legacy_devices.is_empty());
    }
}

#[test]
fn zero_devices_is_not_a_missing_capability() {
    let verdict = CapabilityProbe::new(StaticDeviceQuery::default())
        .probe()
        .unwrap();
    assert!(verdict.adequate);
}
