use serde_json::json;
use similar_asserts::assert_eq;

use envsensor_configuration::environment::FixedEnvironment;
use envsensor_configuration::{write_parsed_configuration, ParsedConfiguration};
use envsensor_service::error::{Error, ErrorKind};
use envsensor_service::service::{RecordService, ServiceSetup, SetupError};
use query_engine_metadata::metadata::{Document, RecordId};
use query_engine_translation::translation::params::QueryParams;
use tests_common::fixtures::{document, new_record, sample_documents, write_data_file, SAMPLE_IDS};
use tests_common::static_files::get_static_configuration_dir;

async fn sample_service() -> RecordService {
    ServiceSetup::new(FixedEnvironment::empty())
        .build(
            get_static_configuration_dir(),
            &mut prometheus::Registry::new(),
        )
        .await
        .unwrap()
}

fn ids(records: &[Document]) -> Vec<&str> {
    records
        .iter()
        .map(|record| record["_id"].as_str().unwrap())
        .collect()
}

mod list {
    use super::*;
    use similar_asserts::assert_eq;

    #[tokio::test]
    async fn filters_and_sorts_across_conventions() {
        let service = sample_service().await;
        let envelope = service
            .list_records(&QueryParams::from_query_string("city=Pune&sort=no"))
            .await
            .unwrap();
        let page = envelope.data.unwrap();
        assert_eq!(ids(&page.records), vec![SAMPLE_IDS[2], SAMPLE_IDS[0], SAMPLE_IDS[3]]);
        // the legacy record comes back under schema names
        assert_eq!(page.records[2]["city"], json!("Pune"));
        assert!(!page.records[2].contains_key("City"));
        assert_eq!(page.pagination.total_records, 3);
        assert_eq!(page.sort_applied, json!({"no": 1, "NO (µg/m3)": 1}));
    }

    #[tokio::test]
    async fn pages_through_results() {
        let service = sample_service().await;
        let envelope = service
            .list_records(&QueryParams::from_query_string("limit=2&page=2"))
            .await
            .unwrap();
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["success"], json!(true));
        assert_eq!(
            value["data"]["pagination"],
            json!({
                "current_page": 2,
                "total_pages": 3,
                "total_records": 6,
                "records_per_page": 2,
                "has_next_page": true,
                "has_prev_page": true,
                "next_page": 3,
                "prev_page": 1
            })
        );
        let page = envelope.data.unwrap();
        assert_eq!(ids(&page.records), vec![SAMPLE_IDS[3], SAMPLE_IDS[2]]);
        assert_eq!(page.query_applied, json!({}));
    }

    #[tokio::test]
    async fn reports_dropped_conditions() {
        let service = sample_service().await;
        let envelope = service
            .list_records(&QueryParams::from_pairs([("$or", "not json")]))
            .await
            .unwrap();
        let page = envelope.data.unwrap();
        assert_eq!(page.records.len(), 6);
        assert_eq!(page.warnings.len(), 1);
    }

    #[tokio::test]
    async fn rejects_invalid_bounds() {
        let service = sample_service().await;
        let err = service
            .list_records(&QueryParams::from_pairs([("no_min", "abc")]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidQuery(_)));
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert_eq!(
            err.to_envelope().message.as_deref(),
            Some("Invalid query parameters")
        );
    }
}

mod get {
    use super::*;
    use similar_asserts::assert_eq;

    #[tokio::test]
    async fn normalizes_legacy_records() {
        let service = sample_service().await;
        let record = service
            .get_record(SAMPLE_IDS[1])
            .await
            .unwrap()
            .data
            .unwrap()
            .record;
        assert_eq!(record["_id"], json!(SAMPLE_IDS[1]));
        assert_eq!(record["city"], json!("Delhi"));
        assert_eq!(record["ws"], json!("*"));
        assert!(!record.contains_key("NO (µg/m3)"));
    }

    #[tokio::test]
    async fn distinguishes_invalid_and_missing_ids() {
        let service = sample_service().await;
        let invalid = service.get_record("not-an-id").await.unwrap_err();
        assert_eq!(invalid.kind(), ErrorKind::BadRequest);

        let missing = service
            .get_record("650000000000000000000099")
            .await
            .unwrap_err();
        assert_eq!(missing.kind(), ErrorKind::NotFound);
    }
}

mod create {
    use super::*;
    use similar_asserts::assert_eq;

    #[tokio::test]
    async fn stores_schema_names() {
        let service = sample_service().await;
        let envelope = service
            .create_record(&new_record(" Agra ", "Mar-19", 9.5))
            .await
            .unwrap();
        assert_eq!(envelope.message.as_deref(), Some("Record created successfully"));
        let record = envelope.data.unwrap().record;
        assert_eq!(record["city"], json!("Agra"));
        assert!(record.contains_key("_id"));
        assert!(record.contains_key("createdAt"));

        let listed = service
            .list_records(&QueryParams::from_pairs([("city", "Agra")]))
            .await
            .unwrap()
            .data
            .unwrap();
        assert_eq!(listed.pagination.total_records, 1);
    }

    #[tokio::test]
    async fn accepts_legacy_input() {
        let service = sample_service().await;
        let mut input = new_record("Agra", "Mar-19", 9.5);
        let city = input.remove("city").unwrap();
        input.insert("City".into(), city);
        let record = service
            .create_record(&input)
            .await
            .unwrap()
            .data
            .unwrap()
            .record;
        assert_eq!(record["city"], json!("Agra"));
        assert!(!record.contains_key("City"));
    }

    #[tokio::test]
    async fn lists_validation_errors() {
        let service = sample_service().await;
        let mut input = new_record("Agra", "March 2019", 9.5);
        input.insert("no".into(), json!(-1));
        let err = service.create_record(&input).await.unwrap_err();
        assert_eq!(
            err.to_envelope().errors,
            Some(vec![
                "NO must be greater than or equal to 0".to_string(),
                "Month-Year must be in format MMM-YY (e.g., Jan-19)".to_string(),
            ])
        );
    }

    #[tokio::test]
    async fn bulk_creates_all_or_nothing() {
        let service = sample_service().await;
        let envelope = service
            .create_records(&[
                new_record("Agra", "Mar-19", 9.5),
                new_record("Agra", "Apr-19", 7.0),
            ])
            .await
            .unwrap();
        assert_eq!(envelope.message.as_deref(), Some("2 records created successfully"));
        assert_eq!(envelope.data.unwrap().count, 2);

        let err = service
            .create_records(&[
                new_record("Goa", "Mar-19", 9.5),
                document(json!({"city": "Goa"})),
            ])
            .await
            .unwrap_err();
        let errors = match err {
            Error::BulkValidationFailed(errors) => errors,
            other => panic!("expected a validation failure, got {other:?}"),
        };
        assert_eq!(errors[0], "Record 2: Month-Year is required and must be a non-empty string");

        let listed = service
            .list_records(&QueryParams::from_pairs([("city", "Goa")]))
            .await
            .unwrap()
            .data
            .unwrap();
        assert_eq!(listed.pagination.total_records, 0);
    }

    #[tokio::test]
    async fn bulk_requests_are_bounded() {
        let service = sample_service().await;
        assert!(matches!(
            service.create_records(&[]).await,
            Err(Error::EmptyBulkRequest)
        ));

        let too_many = vec![new_record("Agra", "Mar-19", 9.5); 1001];
        let err = service.create_records(&too_many).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Maximum 1000 records allowed per bulk operation"
        );
    }
}

mod update {
    use super::*;
    use similar_asserts::assert_eq;

    #[tokio::test]
    async fn replaces_legacy_fields() {
        let service = sample_service().await;
        let envelope = service
            .update_record(SAMPLE_IDS[3], &document(json!({"Temp (°C)": 33})))
            .await
            .unwrap();
        assert_eq!(envelope.message.as_deref(), Some("Record updated successfully"));
        assert_eq!(envelope.data.unwrap().record["temp"].as_f64(), Some(33.0));

        let stored = service
            .state()
            .store
            .find_by_id(&RecordId::parse(SAMPLE_IDS[3]).unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored["temp"].as_f64(), Some(33.0));
        assert!(!stored.contains_key("Temp (°C)"));
        assert_eq!(stored["City"], json!("Pune"));
        assert!(stored.contains_key("updatedAt"));
    }

    #[tokio::test]
    async fn validates_present_fields() {
        let service = sample_service().await;
        let err = service
            .update_record(SAMPLE_IDS[0], &document(json!({"rh": 120})))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_envelope().errors,
            Some(vec!["Relative Humidity must be between 0 and 100".to_string()])
        );
    }

    #[tokio::test]
    async fn missing_records_are_not_found() {
        let service = sample_service().await;
        let err = service
            .update_record("650000000000000000000099", &document(json!({"rh": 20})))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}

mod delete {
    use super::*;
    use similar_asserts::assert_eq;

    #[tokio::test]
    async fn deletes_one_record() {
        let service = sample_service().await;
        let envelope = service.delete_record(SAMPLE_IDS[0]).await.unwrap();
        assert_eq!(envelope.message.as_deref(), Some("Record deleted successfully"));
        assert_eq!(
            envelope.data.unwrap().deleted_record["_id"],
            json!(SAMPLE_IDS[0])
        );

        let err = service.get_record(SAMPLE_IDS[0]).await.unwrap_err();
        assert!(matches!(err, Error::RecordNotFound(_)));
    }

    #[tokio::test]
    async fn deletes_many_records() {
        let service = sample_service().await;
        let requested = vec![
            SAMPLE_IDS[0].to_string(),
            SAMPLE_IDS[1].to_string(),
            "650000000000000000000099".to_string(),
        ];
        let envelope = service.delete_records(&requested).await.unwrap();
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({
                "success": true,
                "data": {"deletedCount": 2, "requestedCount": 3},
                "message": "2 records deleted successfully"
            })
        );
    }

    #[tokio::test]
    async fn rejects_bad_id_lists() {
        let service = sample_service().await;
        assert!(matches!(
            service.delete_records(&[]).await,
            Err(Error::EmptyIdList)
        ));
        assert!(matches!(
            service
                .delete_records(&[SAMPLE_IDS[0].to_string(), "x".to_string()])
                .await,
            Err(Error::InvalidRecordId(_))
        ));
        // nothing was deleted
        assert!(service.get_record(SAMPLE_IDS[0]).await.is_ok());
    }
}

#[tokio::test]
async fn stats_cover_both_conventions() {
    let service = sample_service().await;
    let stats = service.stats().await.unwrap().data.unwrap();
    let overall = stats.overall.unwrap();
    assert_eq!(overall.total_records, 6);
    assert_eq!(overall.avg_no, Some(20.0));
    assert_eq!(overall.avg_temp, Some(24.0));
    assert_eq!(overall.avg_rh, Some(55.0));
    assert_eq!(overall.max_no, Some(41.0));
    assert_eq!(overall.min_no, Some(4.0));
    assert_eq!(overall.cities, vec!["Delhi", "Mumbai", "Pune"]);
    assert_eq!(
        stats
            .by_city
            .iter()
            .map(|city| (city.city.as_deref(), city.count))
            .collect::<Vec<_>>(),
        vec![(Some("Pune"), 3), (Some("Delhi"), 2), (Some("Mumbai"), 1)]
    );
}

mod setup {
    use super::*;
    use similar_asserts::assert_eq;

    #[tokio::test]
    async fn reads_data_file_from_environment() {
        let data_file = write_data_file(&sample_documents()[..2]);
        let dir = tempfile::tempdir().unwrap();
        write_parsed_configuration(ParsedConfiguration::initial(), dir.path())
            .await
            .unwrap();

        let service = ServiceSetup::new(FixedEnvironment::from([(
            "ENVSENSOR_DATA_FILE".into(),
            data_file.path().display().to_string(),
        )]))
        .build(dir.path(), &mut prometheus::Registry::new())
        .await
        .unwrap();
        let page = service
            .list_records(&QueryParams::new())
            .await
            .unwrap()
            .data
            .unwrap();
        assert_eq!(page.pagination.total_records, 2);
    }

    #[tokio::test]
    async fn missing_variable_fails() {
        let dir = tempfile::tempdir().unwrap();
        write_parsed_configuration(ParsedConfiguration::initial(), dir.path())
            .await
            .unwrap();

        let result = ServiceSetup::new(FixedEnvironment::empty())
            .build(dir.path(), &mut prometheus::Registry::new())
            .await;
        assert!(matches!(result, Err(SetupError::MakeRuntimeConfiguration(_))));
    }
}
