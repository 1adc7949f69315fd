// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2024 Takashi Sakamoto

//! In-memory registry of control elements for tests.

use {super::*, std::cell::Cell};

const ENOENT: i32 = 2;
const EIO: i32 = 5;

#[derive(Default)]
pub struct MemoryRegistry {
    entries: Vec<(ElemId, ElemInfo, ElemValue)>,
    fail_io: bool,
    read_count: Cell<usize>,
    written: Vec<ElemId>,
}

pub fn mixer_elem_id(name: &str, index: u32) -> ElemId {
    ElemId::new_by_name(ElemIfaceType::Mixer, 0, 0, name, index)
}

impl MemoryRegistry {
    pub fn add_elem(&mut self, name: &str, index: u32, info: ElemInfo) -> ElemId {
        self.add_elem_by_id(mixer_elem_id(name, index), info)
    }

    pub fn add_elem_by_id(&mut self, elem_id: ElemId, info: ElemInfo) -> ElemId {
        self.entries.push((elem_id.clone(), info, ElemValue::new()));
        elem_id
    }

    pub fn remove_elem(&mut self, name: &str, index: u32) -> ElemId {
        let elem_id = mixer_elem_id(name, index);
        self.entries.retain(|(id, _, _)| id.ne(&elem_id));
        elem_id
    }

    pub fn set_info(&mut self, name: &str, index: u32, info: ElemInfo) -> ElemId {
        let elem_id = mixer_elem_id(name, index);
        self.entry_mut(&elem_id).1 = info;
        elem_id
    }

    fn entry(&self, elem_id: &ElemId) -> &(ElemId, ElemInfo, ElemValue) {
        self.entries
            .iter()
            .find(|(id, _, _)| id.eq(elem_id))
            .unwrap()
    }

    fn entry_mut(&mut self, elem_id: &ElemId) -> &mut (ElemId, ElemInfo, ElemValue) {
        self.entries
            .iter_mut()
            .find(|(id, _, _)| id.eq(elem_id))
            .unwrap()
    }

    pub fn bool(&self, name: &str, index: u32) -> Vec<bool> {
        self.entry(&mixer_elem_id(name, index)).2.boolean().to_vec()
    }

    pub fn int(&self, name: &str, index: u32) -> Vec<i32> {
        self.entry(&mixer_elem_id(name, index)).2.int().to_vec()
    }

    pub fn enumerated(&self, name: &str, index: u32) -> Vec<u32> {
        self.entry(&mixer_elem_id(name, index)).2.enumerated().to_vec()
    }

    pub fn set_bool(&mut self, name: &str, index: u32, vals: &[bool]) -> ElemId {
        let elem_id = mixer_elem_id(name, index);
        self.entry_mut(&elem_id).2.set_bool(vals);
        elem_id
    }

    pub fn set_int(&mut self, name: &str, index: u32, vals: &[i32]) -> ElemId {
        let elem_id = mixer_elem_id(name, index);
        self.entry_mut(&elem_id).2.set_int(vals);
        elem_id
    }

    pub fn set_enum(&mut self, name: &str, index: u32, vals: &[u32]) -> ElemId {
        let elem_id = mixer_elem_id(name, index);
        self.entry_mut(&elem_id).2.set_enum(vals);
        elem_id
    }

    pub fn set_fail_io(&mut self, fail_io: bool) {
        self.fail_io = fail_io;
    }

    pub fn read_count(&self) -> usize {
        self.read_count.get()
    }

    pub fn write_count(&self) -> usize {
        self.written.len()
    }

    /// The names of written control elements in the order of writes.
    pub fn written_names(&self) -> Vec<&str> {
        self.written.iter().map(|elem_id| elem_id.name()).collect()
    }

    fn lookup(&self, elem_id: &ElemId) -> Result<&(ElemId, ElemInfo, ElemValue), RegistryError> {
        self.entries
            .iter()
            .find(|(id, _, _)| id.eq(elem_id))
            .ok_or_else(|| RegistryError::with_errno("No such file or directory", ENOENT))
    }
}

impl ControlRegistry for MemoryRegistry {
    fn elem_id_list(&self) -> Result<Vec<ElemId>, RegistryError> {
        Ok(self.entries.iter().map(|(id, _, _)| id.clone()).collect())
    }

    fn elem_info(&self, elem_id: &ElemId) -> Result<ElemInfo, RegistryError> {
        self.lookup(elem_id).map(|(_, info, _)| info.clone())
    }

    fn read_elem_value(
        &self,
        elem_id: &ElemId,
        elem_value: &mut ElemValue,
    ) -> Result<(), RegistryError> {
        if self.fail_io {
            Err(RegistryError::with_errno("Input/output error", EIO))?;
        }
        let (_, _, value) = self.lookup(elem_id)?;
        *elem_value = value.clone();
        self.read_count.set(self.read_count.get() + 1);
        Ok(())
    }

    fn write_elem_value(
        &mut self,
        elem_id: &ElemId,
        elem_value: &ElemValue,
    ) -> Result<(), RegistryError> {
        if self.fail_io {
            Err(RegistryError::with_errno("Input/output error", EIO))?;
        }
        self.lookup(elem_id)?;
        self.entry_mut(elem_id).2 = elem_value.clone();
        self.written.push(elem_id.clone());
        Ok(())
    }
}
