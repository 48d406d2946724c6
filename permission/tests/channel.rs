use std::sync::Arc;

use camgate_camera::{CameraDeviceInfo, HardwareTier, LensFacing, StaticDeviceQuery};
use camgate_permission::{
    Admission, ChannelListener, CoordinatorConfig, CorrelationToken, Permission,
    PermissionCoordinator, PermissionError, PermissionHost,
};

struct PromptingHost;

impl PermissionHost for PromptingHost {
    fn is_granted(&self, _permission: Permission) -> Result<bool, PermissionError> {
        Ok(false)
    }

    fn request_permissions(
        &self,
        _permissions: &[Permission],
        _token: CorrelationToken,
    ) -> Result<(), PermissionError> {
        Ok(())
    }
}

fn back_camera() -> StaticDeviceQuery {
    StaticDeviceQuery::new(vec![CameraDeviceInfo::new(
        "0",
        HardwareTier::Full,
        LensFacing::Back,
    )])
}

#[tokio::test]
async fn decision_reaches_an_async_consumer() {
    let (listener, decisions) = ChannelListener::new();
    let coordinator = Arc::new(
        PermissionCoordinator::new(
            CoordinatorConfig::default(),
            back_camera(),
            PromptingHost,
            listener,
        )
        .unwrap(),
    );

    let Admission::Awaiting(token) = coordinator.request_camera() else {
        panic!("expected the permission dialog to be requested");
    };

    let responder = Arc::clone(&coordinator);
    tokio::spawn(async move {
        responder.on_permission_response(token, &[true]);
    });

    assert_eq!(decisions.recv().await, Some(true));
    assert_eq!(decisions.try_recv(), None);
}

#[tokio::test]
async fn torn_down_coordinator_closes_the_stream() {
    let (listener, decisions) = ChannelListener::new();
    let coordinator = PermissionCoordinator::new(
        CoordinatorConfig::default(),
        back_camera(),
        PromptingHost,
        listener,
    )
    .unwrap();

    let Admission::Awaiting(token) = coordinator.request_camera() else {
        panic!("expected the permission dialog to be requested");
    };
    coordinator.teardown();
    coordinator.on_permission_response(token, &[true]);
    drop(coordinator);

    assert_eq!(decisions.recv().await, None);
}
