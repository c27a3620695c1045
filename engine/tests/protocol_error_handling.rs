mod common;

use common::{ContactSensor, Locomotor};
use orrery_engine::{
    BitWriter, ComponentError, ComponentKinds, Protocol, ProtocolError,
};

#[test]
fn duplicate_registration_is_a_startup_error() {
    let mut protocol = Protocol::builder();
    protocol.try_add_component::<Locomotor>().unwrap();

    let error = protocol.try_add_component::<Locomotor>().err().unwrap();
    assert_eq!(
        error,
        ProtocolError::DuplicateRegistration {
            component_name: "Locomotor".to_string(),
        }
    );

    // other types still register fine afterwards
    protocol.try_add_component::<ContactSensor>().unwrap();
}

#[test]
fn kinds_registry_rejects_re_registration_directly() {
    let mut kinds = ComponentKinds::new();
    kinds.try_add_component::<ContactSensor>().unwrap();

    assert_eq!(
        kinds.try_add_component::<ContactSensor>().unwrap_err(),
        ComponentError::DuplicateRegistration {
            component_name: "ContactSensor".to_string(),
        }
    );
}

#[test]
fn locked_protocol_rejects_further_changes() {
    let mut protocol = Protocol::builder();
    protocol.try_add_component::<Locomotor>().unwrap();
    protocol.try_lock().unwrap();

    assert_eq!(
        protocol.try_add_component::<ContactSensor>().err().unwrap(),
        ProtocolError::AlreadyLocked
    );
    assert_eq!(
        protocol
            .try_tick_interval(std::time::Duration::from_millis(16))
            .err()
            .unwrap(),
        ProtocolError::AlreadyLocked
    );
    assert_eq!(protocol.try_lock().unwrap_err(), ProtocolError::AlreadyLocked);
}

#[test]
fn writing_an_unregistered_component_is_an_error() {
    let kinds = ComponentKinds::new();
    let mut writer = BitWriter::new();

    let error = kinds
        .try_write(&mut writer, &Locomotor::new(0.0, 0.0))
        .unwrap_err();
    assert_eq!(
        error,
        ComponentError::KindNotRegistered {
            component_name: "Locomotor".to_string(),
        }
    );
}

#[test]
fn registry_names_registered_kinds() {
    let mut kinds = ComponentKinds::new();
    kinds.add_component::<Locomotor>();

    let kind = orrery_engine::ComponentKind::of::<Locomotor>();
    assert!(kinds.is_registered(&kind));
    assert_eq!(kinds.kind_to_name(&kind), Some("Locomotor".to_string()));

    let missing = orrery_engine::ComponentKind::of::<ContactSensor>();
    assert!(!kinds.is_registered(&missing));
    assert_eq!(kinds.kind_to_name(&missing), None);
}
