/*
 *
 *
 *
 *
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 *
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

//! Literal subcategory membership tables
//!
//! Some subcategories in the definition sheet only own a fixed set of
//! indicators; rows that follow them but are not listed belong to the
//! top-level category instead. The lists are data, not derived from the
//! sheet layout, and can be replaced from a JSON file of the form
//! `{"subcategory": ["indicator", ...]}`.

use crate::LoaderResult;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::info;

pub const SECTOR_EMPLOYMENT: &str = "分部门新增就业";
pub const CPI_COMPONENTS: &str = "分项 CPI";
pub const UNEMPLOYMENT_MEASURES: &str = "季调各类型失业率";

const SECTOR_EMPLOYMENT_MEMBERS: &[&str] = &[
  "采矿业",
  "建筑业",
  "制造业",
  "批发业",
  "零售业",
  "运输仓储业",
  "公用事业",
  "信息业",
  "金融活动",
  "专业和商业服务",
  "教育和保健服务",
  "休闲和酒店业",
  "其他服务业",
  "政府",
];

const CPI_COMPONENT_MEMBERS: &[&str] = &[
  "食品",
  "家庭食品",
  "在外饮食",
  "能源",
  "能源商品",
  "燃油和其他燃料",
  "发动机燃料（汽油）",
  "能源服务",
  "电力",
  "公用管道燃气服务",
  "核心商品（不含食品和能源类）",
  "家具和其他家用产品",
  "服饰",
  "交通工具（不含汽车燃料）",
  "新车",
  "二手汽车和卡车",
  "机动车部件和设备",
  "医疗用品",
  "酒精饮料",
  "核心服务（不含能源）",
  "住所",
  "房租",
  "水、下水道和垃圾回收",
  "家庭运营",
  "医疗服务",
  "运输服务",
];

const UNEMPLOYMENT_MEASURE_MEMBERS: &[&str] = &["U-1", "U-2", "U-3", "U-4", "U-5", "U-6"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
  tables: BTreeMap<String, BTreeSet<String>>,
}

impl Default for Membership {
  fn default() -> Self {
    let mut membership = Self::empty();
    membership.insert(SECTOR_EMPLOYMENT, SECTOR_EMPLOYMENT_MEMBERS.iter().copied());
    membership.insert(CPI_COMPONENTS, CPI_COMPONENT_MEMBERS.iter().copied());
    membership.insert(UNEMPLOYMENT_MEASURES, UNEMPLOYMENT_MEASURE_MEMBERS.iter().copied());
    membership
  }
}

impl Membership {
  /// No restricted subcategories: every indicator stays under its subcategory
  pub fn empty() -> Self {
    Self { tables: BTreeMap::new() }
  }

  /// Replace (or add) the member list of one subcategory
  pub fn insert<I, S>(&mut self, subcategory: &str, members: I)
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.tables.insert(subcategory.to_string(), members.into_iter().map(Into::into).collect());
  }

  /// Defaults overlaid with the tables in a JSON file
  pub fn from_json_file(path: &Path) -> LoaderResult<Self> {
    let text = std::fs::read_to_string(path)?;
    let overrides = Self::parse_json(&text)?;
    let mut membership = Self::default();
    for (subcategory, members) in overrides.tables {
      membership.tables.insert(subcategory, members);
    }
    info!("Loaded membership overrides from {}", path.display());
    Ok(membership)
  }

  pub fn parse_json(text: &str) -> LoaderResult<Self> {
    let tables: BTreeMap<String, BTreeSet<String>> = serde_json::from_str(text)?;
    Ok(Self { tables })
  }

  /// Whether `indicator` sits under `subcategory`.
  /// Unrestricted subcategories admit everything.
  pub fn admits(&self, subcategory: &str, indicator: &str) -> bool {
    match self.tables.get(subcategory) {
      Some(members) => members.contains(indicator),
      None => true,
    }
  }

  pub fn subcategories(&self) -> impl Iterator<Item = &str> {
    self.tables.keys().map(String::as_str)
  }
}
