#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::{json, Value};

    use crate::app_system::{AdminSystem, AppConfig, UiConfig};
    use crate::clients::{OrderClient, UserClient};
    use crate::domain::{Brand, Order, OrderLine, OrderPayload, User};
    use crate::mock_framework::{create_mock_api, expect_get, expect_post, expect_put, respond};
    use crate::navigation::{GuardOutcome, GuardState, Leave, Navigator, ResourceKind, Route};
    use crate::resource_framework::ResourceClient;
    use crate::views::{EditView, ListView, Mode, SubmitOutcome};

    fn brand(id: i64, name: &str) -> Value {
        json!({"id": id, "nombre": name, "descripcion": "Herramientas", "fecha": "2024-03-01"})
    }

    #[tokio::test]
    async fn test_list_has_one_row_per_record() {
        // 1. Setup
        let (api, mut receiver) = create_mock_api(4);
        let list_task = tokio::spawn(async move {
            let mut nav = Navigator::new(Route::Home);
            nav.navigate(Route::List(ResourceKind::Users));
            ListView::<User>::open(ResourceClient::new(api), &mut nav, &UiConfig::default()).await
        });

        // 2. Answer the single fetch with 12 users
        let (request, responder) = expect_get(&mut receiver).await.expect("Expected list GET");
        assert_eq!(request.path, "usuario/");
        let users: Vec<Value> = (1..=12)
            .map(|id| {
                json!({"id": id, "nombre": format!("Usuario {id}"), "email": "u@example.com",
                       "direccion": "Calle", "telefono": "555", "fecha": "2024-01-01"})
            })
            .collect();
        respond(responder, 200, Value::Array(users));

        // 3. Verify rows and actions
        let view = list_task.await.unwrap();
        assert!(receiver.try_recv().is_err());
        let rows = view.table().all_rows();
        assert_eq!(rows.len(), 12);
        for row in &rows {
            assert_eq!(row.edit.to_string(), format!("/editar-usuario/{}", row.id));
            assert_eq!(row.delete.to_string(), format!("/eliminar-usuario/{}", row.id));
        }
        assert_eq!(view.table().rows().len(), 10);
    }

    #[tokio::test]
    async fn test_create_posts_once_and_returns_with_message() {
        // 1. Fill the form
        let (api, mut receiver) = create_mock_api(4);
        let mut view = EditView::<Brand>::create(ResourceClient::new(api));
        view.change("name", "Acme").unwrap();
        view.change("description", "Herramientas").unwrap();
        view.change("date", "01-03-2024").unwrap();

        // 2. Submit in background
        let submit_task = tokio::spawn(async move {
            let mut nav = Navigator::new(Route::List(ResourceKind::Brands));
            nav.navigate(Route::Create(ResourceKind::Brands));
            let outcome = view.submit(&mut nav).await;
            (outcome, nav)
        });

        // 3. Exactly one POST with a normalized date
        let (request, responder) = expect_post(&mut receiver).await.expect("Expected POST");
        assert_eq!(request.path, "marca/");
        assert_eq!(
            request.body,
            Some(json!({"nombre": "Acme", "descripcion": "Herramientas", "fecha": "2024-03-01"}))
        );
        respond(responder, 201, brand(1, "Acme"));

        // 4. Back on the list with the message
        let (outcome, mut nav) = submit_task.await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Saved);
        assert!(receiver.try_recv().is_err());
        assert_eq!(nav.current(), &Route::List(ResourceKind::Brands));
        let message = nav.take_message().expect("Expected a message");
        assert!(message.contains("Acme"));
        assert_eq!(nav.take_message(), None);
    }

    #[tokio::test]
    async fn test_missing_required_fields_send_nothing() {
        let (api, mut receiver) = create_mock_api(4);
        let mut view = EditView::<Brand>::create(ResourceClient::new(api));
        view.change("name", "Acme").unwrap();
        let mut nav = Navigator::new(Route::Create(ResourceKind::Brands));

        assert_eq!(view.submit(&mut nav).await, SubmitOutcome::Invalid);
        assert!(view.form().error("description").is_some());
        assert!(view.form().error("date").is_some());
        assert!(view.form().error("name").is_none());
        assert!(receiver.try_recv().is_err());
        assert_eq!(nav.current(), &Route::Create(ResourceKind::Brands));
    }

    #[tokio::test]
    async fn test_edit_prepopulates_fields() {
        // 1. Open the edit view for id 7
        let (api, mut receiver) = create_mock_api(4);
        let open_task = tokio::spawn(async move { EditView::<Brand>::open(ResourceClient::new(api), 7).await });

        let (request, responder) = expect_get(&mut receiver).await.expect("Expected GET");
        assert_eq!(request.path, "marca/7/");
        respond(responder, 200, brand(7, "Acme"));

        // 2. Verify the fields
        let view = open_task.await.unwrap();
        assert_eq!(view.form().text("name"), "Acme");
        assert_eq!(view.form().date("date"), NaiveDate::from_ymd_opt(2024, 3, 1));
        let picker = view.field("date").expect("Expected a date field");
        assert_eq!(picker.display_value(view.form()), "2024-03-01");
        assert!(!view.form().is_dirty());
        assert_eq!(view.guard().state(), GuardState::Clean);
    }

    #[tokio::test]
    async fn test_failed_edit_fetch_keeps_defaults_with_notice() {
        let (api, mut receiver) = create_mock_api(4);
        let open_task = tokio::spawn(async move { EditView::<Brand>::open(ResourceClient::new(api), 7).await });

        let (_, responder) = expect_get(&mut receiver).await.expect("Expected GET");
        respond(responder, 404, json!({"detail": "No encontrado."}));

        let view = open_task.await.unwrap();
        assert_eq!(view.form().text("name"), "");
        assert_eq!(view.load_error(), Some("No se pudo cargar la marca."));
        assert!(view.error().is_none());
    }

    #[tokio::test]
    async fn test_leaving_a_dirty_form_asks_first() {
        // 1. A dirty edit form reached from the list
        let (api, _receiver) = create_mock_api(4);
        let mut view = EditView::<Brand>::edit(ResourceClient::new(api), 7);
        let mut nav = Navigator::new(Route::List(ResourceKind::Brands));
        nav.navigate(Route::Edit(ResourceKind::Brands, 7));
        view.change("name", "Acme Corp").unwrap();

        // 2. Back navigation prompts; declining stays with values intact
        assert_eq!(
            view.leave(&mut nav, Leave::Back),
            GuardOutcome::Prompt("¿Estás seguro de cancelar la edición de la marca?".to_string())
        );
        assert_eq!(view.resolve(&mut nav, false), GuardOutcome::Stayed);
        assert_eq!(nav.current(), &Route::Edit(ResourceKind::Brands, 7));
        assert_eq!(view.form().text("name"), "Acme Corp");

        // 3. Cancel goes through the same guard; accepting navigates
        assert!(matches!(view.cancel(&mut nav), GuardOutcome::Prompt(_)));
        assert_eq!(view.resolve(&mut nav, true), GuardOutcome::Proceeded);
        assert_eq!(nav.current(), &Route::List(ResourceKind::Brands));
    }

    #[tokio::test]
    async fn test_cancel_on_an_untouched_form_still_asks() {
        let (api, _receiver) = create_mock_api(4);
        let mut view = EditView::<User>::create(ResourceClient::new(api));
        let mut nav = Navigator::new(Route::List(ResourceKind::Users));
        nav.navigate(Route::Create(ResourceKind::Users));

        assert_eq!(
            view.cancel(&mut nav),
            GuardOutcome::Prompt("¿Estás seguro de cancelar la creación del usuario?".to_string())
        );
        assert_eq!(nav.current(), &Route::Create(ResourceKind::Users));

        assert_eq!(view.resolve(&mut nav, true), GuardOutcome::Proceeded);
        assert_eq!(nav.current(), &Route::List(ResourceKind::Users));
    }

    #[tokio::test]
    async fn test_discard_that_cannot_go_back_keeps_guarding() {
        // 1. Create form opened directly, so there is no history
        let (api, _receiver) = create_mock_api(4);
        let mut view = EditView::<Brand>::create(ResourceClient::new(api));
        let mut nav = Navigator::new(Route::Create(ResourceKind::Brands));
        view.change("name", "Acme").unwrap();

        // 2. Confirming a back navigation goes nowhere
        assert!(matches!(view.leave(&mut nav, Leave::Back), GuardOutcome::Prompt(_)));
        assert_eq!(view.resolve(&mut nav, true), GuardOutcome::Stayed);
        assert_eq!(nav.current(), &Route::Create(ResourceKind::Brands));
        assert_eq!(view.guard().state(), GuardState::Dirty);

        // 3. The next Cancel still asks
        assert!(matches!(view.cancel(&mut nav), GuardOutcome::Prompt(_)));
        assert_eq!(nav.current(), &Route::Create(ResourceKind::Brands));
        assert_eq!(view.form().text("name"), "Acme");
    }

    #[tokio::test]
    async fn test_unparseable_date_blocks_submit() {
        // 1. A valid date, then input the picker cannot read
        let (api, mut receiver) = create_mock_api(4);
        let mut view = EditView::<Brand>::create(ResourceClient::new(api));
        let mut nav = Navigator::new(Route::Create(ResourceKind::Brands));
        view.change("name", "Acme").unwrap();
        view.change("description", "Herramientas").unwrap();
        view.change("date", "2024-03-01").unwrap();
        assert!(view.change("date", "31-02-2024").is_err());

        // 2. Submit refuses and keeps the message on the field
        assert_eq!(view.submit(&mut nav).await, SubmitOutcome::Invalid);
        assert!(receiver.try_recv().is_err());
        assert_eq!(view.form().error("date"), Some("Fecha inválida: 31-02-2024"));
        assert_eq!(nav.current(), &Route::Create(ResourceKind::Brands));

        // 3. A readable date clears it
        view.change("date", "29-02-2024").unwrap();
        assert_eq!(view.form().error("date"), None);
        assert!(!view.form().has_rejected_input());
    }

    #[tokio::test]
    async fn test_rejected_submission_keeps_values_and_shows_banner() {
        // 1. Loaded edit form with a change
        let (api, mut receiver) = create_mock_api(4);
        let open_task = tokio::spawn(async move { EditView::<Brand>::open(ResourceClient::new(api), 7).await });
        let (_, responder) = expect_get(&mut receiver).await.expect("Expected GET");
        respond(responder, 200, brand(7, "Acme"));
        let mut view = open_task.await.unwrap();
        view.change("name", "Acme Corp").unwrap();
        let before = view.form().values().clone();

        // 2. The backend refuses the PUT
        let submit_task = tokio::spawn(async move {
            let mut nav = Navigator::new(Route::Edit(ResourceKind::Brands, 7));
            let outcome = view.submit(&mut nav).await;
            (outcome, view, nav)
        });
        let (request, responder) = expect_put(&mut receiver).await.expect("Expected PUT");
        assert_eq!(request.path, "marca/7/");
        respond(responder, 400, json!({"nombre": ["Ya existe una marca con este nombre."]}));

        // 3. Nothing moved
        let (outcome, view, mut nav) = submit_task.await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Failed);
        assert_eq!(
            view.error(),
            Some("Error al actualizar la marca. Verifique los datos e intente nuevamente.")
        );
        assert_eq!(view.form().values(), &before);
        assert!(view.form().is_dirty());
        assert_eq!(nav.current(), &Route::Edit(ResourceKind::Brands, 7));
        assert_eq!(nav.take_message(), None);
    }

    #[tokio::test]
    async fn test_order_creation_checks_the_user_first() {
        // 1. Setup
        let (api, mut receiver) = create_mock_api(4);
        let order_client = OrderClient::new(api.clone(), UserClient::new(api));

        let order_task = tokio::spawn(async move {
            let payload = OrderPayload {
                user_id: 1,
                name: "Ana".to_string(),
                national_id: "30111222".to_string(),
                address: "Calle 1".to_string(),
                phone: "555".to_string(),
                email: "ana@example.com".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            };
            order_client.create_order(&payload).await
        });

        // 2. Expect the user lookup
        let (request, responder) = expect_get(&mut receiver).await.expect("Expected user GET");
        assert_eq!(request.path, "usuario/1/");
        respond(
            responder,
            200,
            json!({"id": 1, "nombre": "Ana", "email": "ana@example.com", "direccion": "Calle 1",
                   "telefono": "555", "fecha": "2024-01-10"}),
        );

        // 3. Expect the order create
        let (request, responder) = expect_post(&mut receiver).await.expect("Expected order POST");
        assert_eq!(request.path, "pedido/");
        let body = request.body.unwrap();
        assert_eq!(body["usuario"], 1);
        assert_eq!(body["fecha"], "2024-05-02");
        let mut created = body.clone();
        created["id"] = json!(3);
        respond(responder, 201, created);

        // 4. Verify result
        let order: Order = order_task.await.unwrap().unwrap();
        assert_eq!(order.id, 3);
    }

    #[tokio::test]
    async fn test_order_for_unknown_user_is_not_posted() {
        let (api, mut receiver) = create_mock_api(4);
        let order_client = OrderClient::new(api.clone(), UserClient::new(api));
        let order_task = tokio::spawn(async move {
            let payload = OrderPayload {
                user_id: 9,
                name: "Nadie".to_string(),
                national_id: "1".to_string(),
                address: "-".to_string(),
                phone: "-".to_string(),
                email: "-".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            };
            order_client.create_order(&payload).await
        });

        let (_, responder) = expect_get(&mut receiver).await.expect("Expected user GET");
        respond(responder, 404, json!({"detail": "No encontrado."}));

        assert!(order_task.await.unwrap().is_err());
        assert!(receiver.recv().await.is_none());
    }

    // =========================================================================
    // Against the in-memory backend
    // =========================================================================

    #[tokio::test]
    async fn test_user_round_trip_in_memory() {
        let system = AdminSystem::in_memory(AppConfig::default());
        let mut nav = Navigator::new(Route::List(ResourceKind::Users));

        // 1. Create
        nav.navigate(Route::Create(ResourceKind::Users));
        let mut form = system.open_form::<User>(Mode::Create).await;
        form.change("name", "Carla Ruiz").unwrap();
        form.change("email", "carla@example.com").unwrap();
        form.change("address", "Pasaje 9").unwrap();
        form.change("phone", "555-0303").unwrap();
        form.change("password", "secreto").unwrap();
        form.change("date", "2024-06-01").unwrap();
        assert_eq!(form.submit(&mut nav).await, SubmitOutcome::Saved);

        // 2. The list shows it with the message
        let mut list = system.open_list::<User>(&mut nav).await;
        assert_eq!(list.table().len(), 3);
        assert_eq!(list.message(), Some("El usuario Carla Ruiz se creó correctamente."));

        // 3. Edit without retyping the password
        let mut form = system.open_form::<User>(Mode::Edit(3)).await;
        assert_eq!(form.form().text("password"), "");
        form.change("phone", "555-0404").unwrap();
        assert_eq!(form.submit(&mut nav).await, SubmitOutcome::Saved);
        let user = system.user_client.get_user(3).await.unwrap();
        assert_eq!(user.phone, "555-0404");

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_order_form_autofills_and_saves_in_memory() {
        let system = AdminSystem::in_memory(AppConfig::default());
        let mut nav = Navigator::new(Route::Create(ResourceKind::Orders));

        let mut form = system.open_order_form(Mode::Create).await;
        assert_eq!(form.users().len(), 2);
        form.select_user(2).unwrap();
        form.change("national_id", "28999111").unwrap();
        form.change("date", "2024-06-02").unwrap();
        assert_eq!(form.submit(&mut nav).await, SubmitOutcome::Saved);
        assert_eq!(
            nav.take_message().as_deref(),
            Some("El pedido de Luis Gómez se creó correctamente.")
        );

        let orders = system.order_client.list_orders().await.unwrap();
        let saved = orders.last().unwrap();
        assert_eq!(saved.user_id, 2);
        assert_eq!(saved.address, "Calle Falsa 123");

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_order_lines_and_delete_in_memory() {
        let system = AdminSystem::in_memory(AppConfig::default());
        let mut nav = Navigator::new(Route::Create(ResourceKind::OrderLines));

        // 1. Create a line with a comma decimal
        let mut form = system.open_form::<OrderLine>(Mode::Create).await;
        form.change("order_id", "2").unwrap();
        form.change("product_name", "Destornillador").unwrap();
        form.change("quantity", "3").unwrap();
        form.change("price", "7,50").unwrap();
        assert_eq!(form.submit(&mut nav).await, SubmitOutcome::Saved);

        let list = system.open_list::<OrderLine>(&mut nav).await;
        let row = list.table().all_rows().pop().unwrap();
        assert_eq!(row.cells, vec!["Luis Gómez", "Destornillador", "3", "7.50", "20-05-2024"]);

        // 2. Delete it
        let mut delete = system.open_delete::<OrderLine>(row.id).await;
        assert_eq!(
            delete.prompt(),
            "¿Estás seguro de eliminar el detalle del pedido Destornillador?"
        );
        delete.confirm(&mut nav).await;
        assert_eq!(nav.current(), &Route::List(ResourceKind::OrderLines));
        let lines = system.order_line_client.list_order_lines().await.unwrap();
        assert!(lines.iter().all(|line| line.id != row.id));

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_login_and_super_user_in_memory() {
        let system = AdminSystem::in_memory(AppConfig::default());

        assert!(system.auth_client.login("admin", "wrong").await.is_err());
        let tokens = system.auth_client.login("admin", "admin").await.unwrap();
        assert_eq!(system.api.token().await, Some(tokens.access.clone()));

        system
            .auth_client
            .create_super_user("root", "toor", &tokens.access)
            .await
            .unwrap();
        system.auth_client.logout().await;
        system.auth_client.login("root", "toor").await.unwrap();

        system.shutdown().await.unwrap();
    }
}
