//! The standard provisioning data: two staff accounts, three senders, four
//! receivers and five orders covering every status.
//!
//! Order dates are offsets from the run's start time so the sample data
//! always looks recent. They are written as ISO 8601 text, while
//! `createdAt` on senders and receivers is stamped by the store.

use chrono::{DateTime, Duration, Utc};
use paqueteria_models::{
    AccountDescriptor, Order, OrderStatus, Receiver, Role, Sender, StatusHistory, Timestamp,
};

use super::models::SampleBatch;

pub const ADMIN_EMAIL: &str = "admin@paqueteria.com";
pub const COURIER_EMAIL: &str = "repartidor@paqueteria.com";

const ADMIN_NAME: &str = "Administrador Principal";
const COURIER_NAME: &str = "Juan Repartidor";

pub fn default_accounts() -> Vec<AccountDescriptor> {
    vec![
        AccountDescriptor::new(ADMIN_EMAIL, "Admin123!", ADMIN_NAME, Role::Administrador),
        AccountDescriptor::new(COURIER_EMAIL, "Rep123!", COURIER_NAME, Role::Repartidor),
    ]
}

pub fn sample_batch(now: DateTime<Utc>) -> SampleBatch {
    SampleBatch {
        senders: senders(),
        receivers: receivers(),
        orders: orders(now),
    }
}

struct Contact {
    name: &'static str,
    phone: &'static str,
    address: &'static str,
    email: &'static str,
    rut: &'static str,
}

const JUAN_PEREZ: Contact = Contact {
    name: "Juan Pérez García",
    phone: "+56912345678",
    address: "Av. Libertador Bernardo O'Higgins #1234, Santiago",
    email: "juan.perez@email.com",
    rut: "12.345.678-9",
};

const MARIA_GONZALEZ: Contact = Contact {
    name: "María González López",
    phone: "+56987654321",
    address: "Calle Providencia #5678, Providencia",
    email: "maria.gonzalez@email.com",
    rut: "98.765.432-1",
};

const TECHSTORE: Contact = Contact {
    name: "Comercial TechStore Ltda.",
    phone: "+56922334455",
    address: "Av. Apoquindo #4567, Las Condes",
    email: "ventas@techstore.cl",
    rut: "76.123.456-7",
};

const CARLOS_RAMIREZ: Contact = Contact {
    name: "Carlos Ramírez Silva",
    phone: "+56911223344",
    address: "Paseo Bulnes #987, Santiago Centro",
    email: "carlos.ramirez@email.com",
    rut: "23.456.789-0",
};

const ANA_MARTINEZ: Contact = Contact {
    name: "Ana Martínez Torres",
    phone: "+56966778899",
    address: "Av. Vicuña Mackenna #3210, Ñuñoa",
    email: "ana.martinez@email.com",
    rut: "34.567.890-1",
};

const BUEN_SABOR: Contact = Contact {
    name: "Restaurante El Buen Sabor",
    phone: "+56933445566",
    address: "Av. Italia #1234, Providencia",
    email: "contacto@buensabor.cl",
    rut: "77.234.567-8",
};

const LAURA_FERNANDEZ: Contact = Contact {
    name: "Laura Fernández Gómez",
    phone: "+56955667788",
    address: "Calle Bombero Ossa #567, Santiago",
    email: "laura.fernandez@email.com",
    rut: "45.678.901-2",
};

pub fn senders() -> Vec<Sender> {
    [JUAN_PEREZ, MARIA_GONZALEZ, TECHSTORE]
        .iter()
        .map(|c| Sender {
            name: c.name.to_string(),
            phone: c.phone.to_string(),
            address: c.address.to_string(),
            email: c.email.to_string(),
            rut: c.rut.to_string(),
            active: true,
            created_at: Timestamp::ServerAssigned,
        })
        .collect()
}

pub fn receivers() -> Vec<Receiver> {
    [CARLOS_RAMIREZ, ANA_MARTINEZ, BUEN_SABOR, LAURA_FERNANDEZ]
        .iter()
        .map(|c| Receiver {
            name: c.name.to_string(),
            phone: c.phone.to_string(),
            address: c.address.to_string(),
            email: c.email.to_string(),
            rut: c.rut.to_string(),
            active: true,
            created_at: Timestamp::ServerAssigned,
        })
        .collect()
}

struct OrderFixture<'a> {
    number: &'a str,
    sender: &'a Contact,
    receiver: &'a Contact,
    description: &'a str,
    notes: &'a str,
    history: StatusHistory,
    estimated_delivery: Option<DateTime<Utc>>,
    courier: Option<&'a str>,
}

fn order(fixture: OrderFixture<'_>) -> Order {
    let delivered_at = fixture
        .history
        .current()
        .filter(|c| c.status == OrderStatus::Entregada)
        .map(|c| c.at);

    Order {
        order_number: fixture.number.to_string(),
        sender_name: fixture.sender.name.to_string(),
        sender_phone: fixture.sender.phone.to_string(),
        sender_address: fixture.sender.address.to_string(),
        receiver_name: fixture.receiver.name.to_string(),
        receiver_phone: fixture.receiver.phone.to_string(),
        receiver_address: fixture.receiver.address.to_string(),
        description: fixture.description.to_string(),
        notes: fixture.notes.to_string(),
        created_at: fixture.history.started_at(),
        history: fixture.history,
        estimated_delivery: fixture.estimated_delivery,
        delivered_at,
        assigned_courier: fixture.courier.map(str::to_string),
        created_by: ADMIN_EMAIL.to_string(),
        active: true,
    }
}

pub fn orders(now: DateTime<Utc>) -> Vec<Order> {
    vec![
        order(OrderFixture {
            number: "ORD-2025-001",
            sender: &JUAN_PEREZ,
            receiver: &CARLOS_RAMIREZ,
            description: "Documentos legales importantes",
            notes: "Entregar personalmente, requiere firma",
            history: StatusHistory::created(now, ADMIN_NAME),
            estimated_delivery: None,
            courier: None,
        }),
        order(OrderFixture {
            number: "ORD-2025-002",
            sender: &MARIA_GONZALEZ,
            receiver: &ANA_MARTINEZ,
            description: "Paquete con ropa y accesorios",
            notes: "Tocar el timbre, piso 4",
            history: StatusHistory::created(now - Duration::hours(2), ADMIN_NAME).then(
                OrderStatus::Enviada,
                now - Duration::hours(1),
                ADMIN_NAME,
            ),
            estimated_delivery: Some(now + Duration::days(1)),
            courier: Some(COURIER_NAME),
        }),
        order(OrderFixture {
            number: "ORD-2025-003",
            sender: &TECHSTORE,
            receiver: &BUEN_SABOR,
            description: "Equipamiento tecnológico (2 notebooks, 1 impresora)",
            notes: "Frágil - Manejar con cuidado",
            history: StatusHistory::created(now - Duration::days(1), ADMIN_NAME)
                .then(OrderStatus::Enviada, now - Duration::hours(6), ADMIN_NAME)
                .then(OrderStatus::Repartiendo, now - Duration::hours(1), COURIER_NAME),
            estimated_delivery: Some(now),
            courier: Some(COURIER_NAME),
        }),
        order(OrderFixture {
            number: "ORD-2025-004",
            sender: &JUAN_PEREZ,
            receiver: &LAURA_FERNANDEZ,
            description: "Caja con libros de estudio",
            notes: "Cliente conforme con la entrega",
            history: StatusHistory::created(now - Duration::days(2), ADMIN_NAME)
                .then(
                    OrderStatus::Enviada,
                    now - Duration::days(1) - Duration::hours(18),
                    ADMIN_NAME,
                )
                .then(
                    OrderStatus::Repartiendo,
                    now - Duration::days(1) - Duration::hours(2),
                    COURIER_NAME,
                )
                .then(OrderStatus::Entregada, now - Duration::days(1), COURIER_NAME),
            estimated_delivery: Some(now - Duration::days(1)),
            courier: Some(COURIER_NAME),
        }),
        order(OrderFixture {
            number: "ORD-2025-005",
            sender: &MARIA_GONZALEZ,
            receiver: &CARLOS_RAMIREZ,
            description: "Productos de farmacia",
            notes: "Urgente - medicamentos recetados",
            history: StatusHistory::created(now - Duration::minutes(30), ADMIN_NAME),
            estimated_delivery: None,
            courier: None,
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use paqueteria_models::{FieldValue, ToDocument, format_order_date};
    use paqueteria_store::firestore::codec::encode_document;
    use serde_json::json;
    use std::collections::HashSet;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_accounts() {
        let accounts = default_accounts();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].email, "admin@paqueteria.com");
        assert_eq!(accounts[0].password, "Admin123!");
        assert_eq!(accounts[0].role, Role::Administrador);
        assert_eq!(accounts[1].role, Role::Repartidor);

        let emails: HashSet<&str> = accounts.iter().map(|a| a.email.as_str()).collect();
        assert_eq!(emails.len(), accounts.len());
    }

    #[test]
    fn test_batch_sizes() {
        let batch = sample_batch(now());
        assert_eq!(batch.senders.len(), 3);
        assert_eq!(batch.receivers.len(), 4);
        assert_eq!(batch.orders.len(), 5);
    }

    #[test]
    fn test_every_order_is_valid() {
        for order in orders(now()) {
            order.validate().unwrap();
        }
    }

    #[test]
    fn test_status_mix() {
        let statuses: Vec<OrderStatus> = orders(now()).iter().map(Order::status).collect();
        assert_eq!(
            statuses,
            vec![
                OrderStatus::Creada,
                OrderStatus::Enviada,
                OrderStatus::Repartiendo,
                OrderStatus::Entregada,
                OrderStatus::Creada,
            ]
        );
    }

    #[test]
    fn test_delivered_order() {
        let orders = orders(now());
        let delivered = orders
            .iter()
            .find(|o| o.status() == OrderStatus::Entregada)
            .unwrap();

        let statuses: Vec<OrderStatus> = delivered
            .history
            .entries()
            .iter()
            .map(|c| c.status)
            .collect();
        assert_eq!(statuses, OrderStatus::ALL.to_vec());

        let entries = delivered.history.entries();
        assert!(entries.windows(2).all(|w| w[0].at <= w[1].at));

        let delivered_at = delivered.delivered_at.unwrap();
        assert!(delivered_at >= entries[3].at);
        assert_eq!(delivered_at, now() - Duration::days(1));
    }

    #[test]
    fn test_undelivered_orders_have_no_delivery_date() {
        for order in orders(now()) {
            if order.status() != OrderStatus::Entregada {
                assert!(order.delivered_at.is_none());
                assert!(order.to_document().get("fechaEntrega").unwrap().is_null());
            }
        }
    }

    #[test]
    fn test_order_dates_are_literal_text() {
        let orders = orders(now());
        let document = orders[0].to_document();
        assert_eq!(
            document.get("fechaCreacion"),
            Some(&FieldValue::String(format_order_date(now())))
        );
        assert_eq!(document.get_str("createdBy"), Some(ADMIN_EMAIL));
    }

    #[test]
    fn test_parties_are_server_stamped() {
        assert!(senders().iter().all(|s| s.created_at.is_server_assigned()));
        assert!(receivers().iter().all(|r| r.active && r.created_at.is_server_assigned()));
    }

    #[test]
    fn test_order_dates_go_over_the_wire_as_strings() {
        let orders = orders(now());
        let delivered = orders
            .iter()
            .find(|o| o.status() == OrderStatus::Entregada)
            .unwrap();
        let encoded = encode_document(&delivered.to_document()).unwrap();

        assert_eq!(
            encoded.fields["fechaCreacion"],
            json!({"stringValue": "2025-06-13T10:00:00.000000Z"})
        );
        assert_eq!(
            encoded.fields["fechaEntrega"],
            json!({"stringValue": "2025-06-14T10:00:00.000000Z"})
        );
        let history = &encoded.fields["estadoHistorial"]["arrayValue"]["values"];
        assert_eq!(
            history[3]["mapValue"]["fields"]["fecha"],
            json!({"stringValue": "2025-06-14T10:00:00.000000Z"})
        );
        assert!(encoded.server_timestamps.is_empty());
    }
}
