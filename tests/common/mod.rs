//! DICOM fixtures written to temporary directories.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use dicom_core::{DataElement, PrimitiveValue, Tag, VR};
use dicom_dictionary_std::{StandardDataDictionary, tags};
use dicom_object::{FileDicomObject, FileMetaTableBuilder};

const EXPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2.1";
const DIGITAL_MAMMOGRAPHY_PRESENTATION: &str = "1.2.840.10008.5.1.4.1.1.1.2";

/// Writes a DICOM file holding `elements` to `path`.
pub fn write_dicom(path: &Path, instance: u32, elements: &[(Tag, VR, &str)]) {
    let sop_instance_uid = format!("1.2.826.0.1.3680043.9.7433.{instance}");
    let meta = FileMetaTableBuilder::new()
        .transfer_syntax(EXPLICIT_VR_LITTLE_ENDIAN)
        .media_storage_sop_class_uid(DIGITAL_MAMMOGRAPHY_PRESENTATION)
        .media_storage_sop_instance_uid(sop_instance_uid.as_str())
        .build()
        .unwrap();

    let mut obj = FileDicomObject::new_empty_with_dict_and_meta(StandardDataDictionary, meta);
    obj.put(DataElement::new(
        tags::SOP_CLASS_UID,
        VR::UI,
        PrimitiveValue::from(DIGITAL_MAMMOGRAPHY_PRESENTATION),
    ));
    obj.put(DataElement::new(
        tags::SOP_INSTANCE_UID,
        VR::UI,
        PrimitiveValue::from(sop_instance_uid.as_str()),
    ));
    for (tag, vr, value) in elements {
        obj.put(DataElement::new(*tag, *vr, PrimitiveValue::from(*value)));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    obj.write_to_file(path).unwrap();
}

/// Writes a mammogram header with the given subject attributes.
pub fn write_mammogram(path: &Path, instance: u32, patient_id: &str, laterality: &str, view: &str, date: &str) {
    write_dicom(
        path,
        instance,
        &[
            (tags::PATIENT_ID, VR::LO, patient_id),
            (tags::IMAGE_LATERALITY, VR::CS, laterality),
            (tags::VIEW_POSITION, VR::CS, view),
            (tags::STUDY_DATE, VR::DA, date),
        ],
    );
}

/// Eight files for one subject: laterality {L,R} x view {CC,MLO}, each
/// acquired twice in separate series folders.
pub fn write_patient(root: &Path, patient_id: &str, date: &str, series: &[&str], first_instance: u32) {
    let mut instance = first_instance;
    for folder in series {
        let mut index = 0;
        for laterality in ["R", "L"] {
            for view in ["MLO", "CC"] {
                let path = root.join(folder).join(format!("{index:06}.dcm"));
                write_mammogram(&path, instance, patient_id, laterality, view, date);
                index += 1;
                instance += 1;
            }
        }
    }
}

pub fn write_patient_a(root: &Path) {
    write_patient(
        root,
        "TCGA-AO-A0JB",
        "20010607",
        &["4947-DIG DIAG MAMMOGR-94476", "4948-DIG DIAG MAMMOGR-94477"],
        100,
    );
}

pub fn write_patient_b(root: &Path) {
    write_patient(
        root,
        "TCGA-AO-A0JI",
        "20010505",
        &[
            "1-MAMMOGRAM DIGITAL SCR BILAT-10301",
            "2-MAMMOGRAM DIGITAL SCR BILAT-10302",
            "3-MAMMOGRAM DIGITAL DX BILAT-10303",
            "4-MAMMOGRAM DIGITAL DX BILAT-10304",
        ],
        200,
    );
}

pub const PATIENT_A_NAMES: [&str; 8] = [
    "TCGA-AO-A0JB_L_CC_20010607_1.dcm",
    "TCGA-AO-A0JB_L_CC_20010607_2.dcm",
    "TCGA-AO-A0JB_L_MLO_20010607_1.dcm",
    "TCGA-AO-A0JB_L_MLO_20010607_2.dcm",
    "TCGA-AO-A0JB_R_CC_20010607_1.dcm",
    "TCGA-AO-A0JB_R_CC_20010607_2.dcm",
    "TCGA-AO-A0JB_R_MLO_20010607_1.dcm",
    "TCGA-AO-A0JB_R_MLO_20010607_2.dcm",
];

/// Sorted names of the regular files directly inside `dir`.
pub fn list_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap())
        .filter(|entry| entry.file_type().unwrap().is_file())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
